pub mod ask;
pub mod config;
pub mod models;
pub mod providers;

use anyhow::{Result, bail};
use bolt_models::auth::KeyringStore;
use bolt_models::providers::LlmProvider;
use bolt_models::{Env, ModelListOptions, ModelRegistry};
use std::sync::Arc;

use crate::config::ConfigLoader;

/// Keyring service under which API keys are stored.
pub const KEYRING_SERVICE: &str = "bolt";

/// Everything a command needs to talk to providers.
pub struct Context {
    pub registry: ModelRegistry,
    pub options: ModelListOptions,
}

impl Context {
    /// Load config layers, bind the process environment, and pull stored keys
    /// from the keyring.
    pub fn load() -> Result<Self> {
        let config = ConfigLoader::load()?;
        let mut registry = ModelRegistry::new(Env::from_process());
        if let Some(name) = &config.default_provider {
            registry = registry.with_default_provider(name.clone());
        }

        let store = KeyringStore::new(KEYRING_SERVICE);
        let keyring_keys = store.load_api_keys(registry.all_providers().iter().map(|p| p.name()));
        let options = config.list_options(keyring_keys);

        Ok(Self {
            registry,
            options,
        })
    }

    /// Look up a provider by name, or the default when `name` is `None`.
    pub fn provider(&self, name: Option<&str>) -> Result<&Arc<dyn LlmProvider>> {
        match name {
            Some(name) => match self.registry.provider(name) {
                Some(provider) => Ok(provider),
                None => bail!(
                    "Unknown provider '{}'. Run `bolt providers` to see available providers.",
                    name
                ),
            },
            None => match self.registry.default_provider() {
                Some(provider) => Ok(provider),
                None => bail!("No providers registered"),
            },
        }
    }
}
