//! Catalog-driven provider implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{
    LlmProvider, ModelHandle, ModelInstanceRequest, ModelListing, ProviderConfig, ProviderSpec,
    anthropic, catalog::CATALOG, ollama, openai,
};
use crate::auth::{self, ApiKey, ResolveRequest, ResolvedCredentials};
use crate::cache::{self, DynamicModelCache};
use crate::{Env, Error, ModelInfo, ModelListOptions, Result};

/// A provider backed by one [`ProviderSpec`] row.
pub struct Provider {
    spec: &'static ProviderSpec,
    static_models: Vec<ModelInfo>,
    process_env: Arc<Env>,
    cache: DynamicModelCache,
    client: reqwest::Client,
}

/// Endpoint and key a provider is allowed to call with.
struct Admission {
    base_url: String,
    api_key: Option<ApiKey>,
}

impl Provider {
    /// Create a provider for `spec`, reading fallback settings from `process_env`.
    pub fn new(spec: &'static ProviderSpec, process_env: Arc<Env>) -> Self {
        Self::with_client(spec, process_env, reqwest::Client::new())
    }

    /// Like [`Provider::new`], but listing and chat calls go through `client`.
    pub fn with_client(
        spec: &'static ProviderSpec,
        process_env: Arc<Env>,
        client: reqwest::Client,
    ) -> Self {
        let static_models = spec
            .static_models
            .iter()
            .map(|m| {
                ModelInfo::builder(spec.name, m.name)
                    .label(m.label)
                    .max_token_allowed(m.max_tokens)
                    .build()
            })
            .collect();
        Self {
            spec,
            static_models,
            process_env,
            cache: DynamicModelCache::new(),
            client,
        }
    }

    /// The catalog row this provider interprets.
    pub fn spec(&self) -> &'static ProviderSpec {
        self.spec
    }

    /// Resolve credentials and check everything a network call needs.
    ///
    /// A missing key is reported before a missing base URL or extra setting.
    fn admit(&self, options: &ModelListOptions) -> Result<Admission> {
        let resolved = self.resolve_base_url_and_key(options);
        let name = self.spec.name;

        if self.spec.requires_api_key && resolved.api_key.is_none() {
            return Err(Error::MissingApiKey {
                provider: name.to_string(),
            });
        }

        let mut base_url = resolved.base_url;
        for key in self.spec.extra_keys {
            let value = auth::resolve_setting(name, key, options, &self.process_env).ok_or_else(
                || Error::MissingSetting {
                    provider: name.to_string(),
                    key: (*key).to_string(),
                },
            )?;
            base_url = base_url.replace(&format!("{{{key}}}"), value);
        }

        if base_url.is_empty() {
            return Err(Error::MissingBaseUrl {
                provider: name.to_string(),
            });
        }

        Ok(Admission {
            base_url,
            api_key: resolved.api_key,
        })
    }
}

#[async_trait]
impl LlmProvider for Provider {
    fn name(&self) -> &str {
        self.spec.name
    }

    fn static_models(&self) -> &[ModelInfo] {
        &self.static_models
    }

    fn config(&self) -> ProviderConfig {
        self.spec.config
    }

    fn api_key_link(&self) -> Option<&str> {
        self.spec.api_key_link
    }

    fn label_for_get_api_key(&self) -> Option<&str> {
        self.spec.label_for_get_api_key
    }

    fn resolve_base_url_and_key(&self, options: &ModelListOptions) -> ResolvedCredentials {
        auth::resolve_base_url_and_key(ResolveRequest {
            provider: self.spec.name,
            options,
            process_env: &self.process_env,
            base_url_key: self.spec.config.base_url_key,
            api_token_key: self.spec.config.api_token_key,
            default_base_url: self.spec.default_base_url,
        })
    }

    fn model_instance(&self, request: ModelInstanceRequest<'_>) -> Result<ModelHandle> {
        let admission = self.admit(request.options)?;
        debug!(
            provider = self.spec.name,
            model = request.model,
            base_url = %admission.base_url,
            "created model instance"
        );
        Ok(ModelHandle::new(
            self.spec.name,
            request.model,
            admission.base_url,
            admission.api_key,
            self.spec.wire,
            self.client.clone(),
        ))
    }

    fn supports_dynamic_models(&self) -> bool {
        self.spec.listing.is_some()
    }

    async fn dynamic_models(&self, options: &ModelListOptions) -> Result<Vec<ModelInfo>> {
        let listing = self
            .spec
            .listing
            .ok_or_else(|| Error::DynamicModelsUnsupported(self.spec.name.to_string()))?;
        let Admission { base_url, api_key } = self.admit(options)?;
        let name = self.spec.name;
        let key = api_key.as_ref();

        let models = match listing {
            ModelListing::OpenAi => {
                openai::list_models(&self.client, name, &base_url, key, false).await?
            }
            ModelListing::Together => {
                openai::list_models(&self.client, name, &base_url, key, true).await?
            }
            ModelListing::Anthropic => {
                anthropic::list_models(&self.client, name, &base_url, key).await?
            }
            ModelListing::Ollama => ollama::list_models(&self.client, name, &base_url).await?,
        };

        if models.is_empty() {
            return Err(Error::ProviderApi(format!(
                "{name} model listing returned no models"
            )));
        }
        debug!(provider = name, models = models.len(), "fetched dynamic models");
        Ok(models)
    }

    fn cache(&self) -> &DynamicModelCache {
        &self.cache
    }

    fn cache_fingerprint(&self, options: &ModelListOptions) -> String {
        cache::fingerprint(self.spec.name, &self.spec.env_keys(), options)
    }
}

/// Build one provider per catalog row, sharing `process_env` and an HTTP client.
pub fn builtin_providers(process_env: Arc<Env>) -> Vec<Arc<dyn LlmProvider>> {
    let client = reqwest::Client::new();
    CATALOG
        .iter()
        .map(|spec| {
            Arc::new(Provider::with_client(
                spec,
                Arc::clone(&process_env),
                client.clone(),
            )) as Arc<dyn LlmProvider>
        })
        .collect()
}
