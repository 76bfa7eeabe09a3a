//! Provider trait and the built-in, catalog-driven implementation.
//!
//! The [`LlmProvider`] trait is the seam between the registry and vendors.
//! Built-in vendors are all served by [`Provider`], which reads its behavior
//! from a [`ProviderSpec`] row in [`catalog::CATALOG`]. Tests and embedders can
//! register their own implementations.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bolt_models::providers::{ChatRequest, LlmProvider, Message, ModelInstanceRequest, Provider, find_spec};
//! use bolt_models::{Env, ModelListOptions};
//!
//! # async fn run() -> bolt_models::Result<()> {
//! let spec = find_spec("Deepseek").ok_or(bolt_models::Error::ProviderNotFound("Deepseek".into()))?;
//! let provider = Provider::new(spec, Arc::new(Env::from_process()));
//! let options = ModelListOptions::new().with_api_key("Deepseek", "sk-...");
//!
//! let handle = provider.model_instance(ModelInstanceRequest {
//!     model: "deepseek-chat",
//!     options: &options,
//! })?;
//! let response = handle.chat(ChatRequest::new(vec![Message::user("Hello!")])).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

mod anthropic;
pub mod catalog;
mod handle;
mod ollama;
mod openai;
mod provider;
mod types;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

pub use catalog::{ModelListing, ProviderConfig, ProviderSpec, StaticModel, WireFormat, find_spec};
pub use handle::ModelHandle;
pub use provider::{Provider, builtin_providers};
pub use types::*;

use crate::auth::ResolvedCredentials;
use crate::cache::{self, DynamicModelCache};
use crate::{Error, ModelInfo, ModelListOptions, Result};

/// Upper bound on a single model-listing request.
pub const DEFAULT_LISTING_TIMEOUT: Duration = Duration::from_secs(10);

/// Arguments for [`LlmProvider::model_instance`].
#[derive(Debug, Clone, Copy)]
pub struct ModelInstanceRequest<'a> {
    /// Vendor model id.
    pub model: &'a str,
    /// Caller credentials and settings.
    pub options: &'a ModelListOptions,
}

/// A model vendor.
///
/// # Required Methods
///
/// - [`name`](LlmProvider::name) - unique provider name
/// - [`static_models`](LlmProvider::static_models) - hand-curated models
/// - [`config`](LlmProvider::config) - environment keys for credentials
/// - [`resolve_base_url_and_key`](LlmProvider::resolve_base_url_and_key)
/// - [`model_instance`](LlmProvider::model_instance) - build a ready client
/// - [`cache`](LlmProvider::cache) - the provider's dynamic model cache
///
/// Providers with a listing endpoint also override
/// [`supports_dynamic_models`](LlmProvider::supports_dynamic_models) and
/// [`dynamic_models`](LlmProvider::dynamic_models).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    fn static_models(&self) -> &[ModelInfo];

    fn config(&self) -> ProviderConfig;

    /// Where users obtain an API key.
    fn api_key_link(&self) -> Option<&str> {
        None
    }

    /// Link text for [`api_key_link`](LlmProvider::api_key_link).
    fn label_for_get_api_key(&self) -> Option<&str> {
        None
    }

    /// Resolve the effective base URL and key. Never fails.
    fn resolve_base_url_and_key(&self, options: &ModelListOptions) -> ResolvedCredentials;

    /// Build a configured client for one model.
    ///
    /// # Errors
    ///
    /// `Error::MissingApiKey` when a key is required but none resolved.
    fn model_instance(&self, request: ModelInstanceRequest<'_>) -> Result<ModelHandle>;

    fn supports_dynamic_models(&self) -> bool {
        false
    }

    /// Fetch the vendor's current model list.
    async fn dynamic_models(&self, _options: &ModelListOptions) -> Result<Vec<ModelInfo>> {
        Err(Error::DynamicModelsUnsupported(self.name().to_string()))
    }

    fn cache(&self) -> &DynamicModelCache;

    /// Fingerprint of the credentials that affect this provider's listing.
    fn cache_fingerprint(&self, options: &ModelListOptions) -> String {
        let config = self.config();
        let keys: Vec<&str> = config
            .api_token_key
            .into_iter()
            .chain(config.base_url_key)
            .collect();
        cache::fingerprint(self.name(), &keys, options)
    }

    /// Cached dynamic models, if fetched under the same credentials.
    fn models_from_cache(&self, options: &ModelListOptions) -> Option<Vec<ModelInfo>> {
        self.cache().get(&self.cache_fingerprint(options))
    }

    /// Remember `models` as fetched under `options`.
    fn store_dynamic_models(&self, options: &ModelListOptions, models: Vec<ModelInfo>) {
        self.cache().store(self.cache_fingerprint(options), models);
    }
}

/// Read a response body, mapping non-success statuses to `Error::ProviderApi`.
pub(crate) async fn read_body(response: reqwest::Response, provider: &str) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::ProviderApi(format!(
            "{provider} API returned {status}: {body}"
        )));
    }
    response
        .text()
        .await
        .map_err(|e| Error::Request(e.to_string()))
}

/// Read and decode a JSON response body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    provider: &str,
) -> Result<T> {
    let body = read_body(response, provider).await?;
    Ok(serde_json::from_str(&body)?)
}
