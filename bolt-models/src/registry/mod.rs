//! Registry of providers and the aggregated model list.
//!
//! The registry owns the provider set, remembers the last aggregated model
//! list, and fans out to every enabled provider when asked to refresh it.
//! A failing provider never fails the refresh: its static models stand in.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::providers::{LlmProvider, builtin_providers};
use crate::{Env, Error, ModelInfo, ModelListOptions, Result, merge_models};

static INSTANCE: OnceLock<ModelRegistry> = OnceLock::new();

/// Provider metadata for listings and setup screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub name: String,
    pub static_models: Vec<ModelInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_api_key_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_for_get_api_key: Option<String>,
}

impl ProviderInfo {
    fn from_provider(provider: &dyn LlmProvider) -> Self {
        Self {
            name: provider.name().to_string(),
            static_models: provider.static_models().to_vec(),
            get_api_key_link: provider.api_key_link().map(str::to_string),
            label_for_get_api_key: provider.label_for_get_api_key().map(str::to_string),
        }
    }
}

/// Providers in registration order plus the last aggregated model list.
pub struct ModelRegistry {
    env: Arc<Env>,
    providers: Vec<Arc<dyn LlmProvider>>,
    default_provider: Option<String>,
    provider_infos: OnceLock<Vec<ProviderInfo>>,
    model_list: RwLock<Option<Vec<ModelInfo>>>,
}

impl ModelRegistry {
    /// Create a registry holding every built-in provider.
    ///
    /// `env` is the process environment snapshot providers fall back to when
    /// a request carries no credential of its own.
    pub fn new(env: Env) -> Self {
        let env = Arc::new(env);
        let providers = builtin_providers(Arc::clone(&env));
        info!(providers = providers.len(), "model registry initialized");
        Self {
            env,
            providers,
            default_provider: None,
            provider_infos: OnceLock::new(),
            model_list: RwLock::new(None),
        }
    }

    /// Create a registry with no providers.
    pub fn empty(env: Env) -> Self {
        Self {
            env: Arc::new(env),
            providers: Vec::new(),
            default_provider: None,
            provider_infos: OnceLock::new(),
            model_list: RwLock::new(None),
        }
    }

    /// Process-wide registry. The first caller's `env` is kept; later
    /// arguments are ignored.
    pub fn instance(env: &Env) -> &'static ModelRegistry {
        INSTANCE.get_or_init(|| ModelRegistry::new(env.clone()))
    }

    /// Register a provider, replacing any provider with the same name in place.
    pub fn register_provider(&mut self, provider: Arc<dyn LlmProvider>) {
        let name = provider.name().to_string();
        match self.providers.iter().position(|p| p.name() == name) {
            Some(index) => {
                debug!(provider = %name, "replacing provider");
                self.providers[index] = provider;
            }
            None => {
                debug!(provider = %name, "registering provider");
                self.providers.push(provider);
            }
        }
        self.provider_infos = OnceLock::new();
        *self
            .model_list
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Use `name` as the default provider instead of the first registered.
    pub fn with_default_provider(mut self, name: impl Into<String>) -> Self {
        self.default_provider = Some(name.into());
        self
    }

    /// The process environment snapshot bound at construction.
    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn provider(&self, name: &str) -> Option<&Arc<dyn LlmProvider>> {
        self.providers.iter().find(|p| p.name() == name)
    }

    /// All providers in registration order.
    pub fn all_providers(&self) -> &[Arc<dyn LlmProvider>] {
        &self.providers
    }

    /// The configured default provider, else the first registered one.
    pub fn default_provider(&self) -> Option<&Arc<dyn LlmProvider>> {
        self.default_provider
            .as_deref()
            .and_then(|name| self.provider(name))
            .or_else(|| self.providers.first())
    }

    /// Metadata for every provider, computed on first call.
    pub fn provider_infos(&self) -> &[ProviderInfo] {
        self.provider_infos.get_or_init(|| {
            self.providers
                .iter()
                .map(|p| ProviderInfo::from_provider(p.as_ref()))
                .collect()
        })
    }

    /// Static models of every provider, in registration order.
    pub fn static_model_list(&self) -> Vec<ModelInfo> {
        self.providers
            .iter()
            .flat_map(|p| p.static_models().iter().cloned())
            .collect()
    }

    /// Static models of one provider.
    ///
    /// # Errors
    ///
    /// `Error::ProviderNotFound` for an unknown name.
    pub fn static_model_list_from_provider(&self, name: &str) -> Result<Vec<ModelInfo>> {
        self.provider(name)
            .map(|p| p.static_models().to_vec())
            .ok_or_else(|| Error::ProviderNotFound(name.to_string()))
    }

    /// The last aggregated list, or the static list before the first refresh.
    pub fn model_list(&self) -> Vec<ModelInfo> {
        self.model_list
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| self.static_model_list())
    }

    /// Refresh the aggregated list from every enabled provider concurrently.
    ///
    /// Providers whose listing fails contribute their static models. Disabled
    /// providers contribute nothing.
    pub async fn update_model_list(&self, options: &ModelListOptions) -> Vec<ModelInfo> {
        let enabled: Vec<&dyn LlmProvider> = self
            .providers
            .iter()
            .filter(|p| options.is_enabled(p.name()))
            .map(Arc::as_ref)
            .collect();

        let lists = join_all(enabled.iter().map(|p| provider_models(*p, options))).await;
        let models: Vec<ModelInfo> = lists.into_iter().flatten().collect();

        *self
            .model_list
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(models.clone());
        info!(
            providers = enabled.len(),
            models = models.len(),
            "updated model list"
        );
        models
    }

    /// Static and dynamic models of one provider.
    ///
    /// # Errors
    ///
    /// `Error::ProviderNotFound` for an unknown name. Listing failures fall
    /// back to static models and are not errors.
    pub async fn model_list_from_provider(
        &self,
        name: &str,
        options: &ModelListOptions,
    ) -> Result<Vec<ModelInfo>> {
        let provider = self
            .provider(name)
            .ok_or_else(|| Error::ProviderNotFound(name.to_string()))?;
        Ok(provider_models(provider.as_ref(), options).await)
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ModelRegistry")
            .field("providers", &names)
            .field("default_provider", &self.default_provider)
            .field("env", &self.env)
            .finish()
    }
}

async fn provider_models(provider: &dyn LlmProvider, options: &ModelListOptions) -> Vec<ModelInfo> {
    let static_models = provider.static_models();

    if let Some(cached) = provider.models_from_cache(options) {
        return merge_models(static_models, &cached);
    }
    if !provider.supports_dynamic_models() {
        return static_models.to_vec();
    }

    match provider.dynamic_models(options).await {
        Ok(dynamic) => {
            provider.store_dynamic_models(options, dynamic.clone());
            merge_models(static_models, &dynamic)
        }
        Err(e) if e.is_missing_credential() => {
            debug!(provider = provider.name(), error = %e, "skipping dynamic listing");
            static_models.to_vec()
        }
        Err(e) => {
            warn!(
                provider = provider.name(),
                error = %e,
                "dynamic model listing failed, using static models"
            );
            static_models.to_vec()
        }
    }
}
