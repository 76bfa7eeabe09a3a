use std::collections::BTreeMap;

use bolt_models::{Env, ModelListOptions, ProviderSetting};
use serde::{Deserialize, Serialize};

/// Placeholder printed instead of secrets.
pub const REDACTED: &str = "********";

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawBoltConfig {
    /// Provider used when a command does not name one
    pub default_provider: Option<String>,

    /// API keys by provider name
    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,

    /// Per-provider settings
    #[serde(default)]
    pub providers: BTreeMap<String, RawProviderSection>,

    /// Server environment handed to providers
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Provider section as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawProviderSection {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub enabled: Option<bool>,
    /// Provider-specific settings such as a Vertex project id
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Final configuration after merging all layers
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BoltConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,

    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,

    #[serde(default)]
    pub providers: BTreeMap<String, ProviderSection>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Disabled providers are left out of aggregated model lists
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            enabled: true,
            extra: BTreeMap::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

impl From<&ProviderSection> for ProviderSetting {
    fn from(section: &ProviderSection) -> Self {
        ProviderSetting {
            base_url: section.base_url.clone(),
            api_key: section.api_key.clone(),
            enabled: Some(section.enabled),
            extra: section.extra.clone(),
        }
    }
}

impl BoltConfig {
    /// Build the per-call options handed to the registry.
    ///
    /// `keyring_keys` sit under the config file's `api_keys`: a key written
    /// in a config file wins over one stored in the keyring.
    pub fn list_options(&self, keyring_keys: BTreeMap<String, String>) -> ModelListOptions {
        let mut api_keys = keyring_keys;
        api_keys.extend(
            self.api_keys
                .iter()
                .filter(|(_, key)| !key.is_empty())
                .map(|(provider, key)| (provider.clone(), key.clone())),
        );

        ModelListOptions {
            api_keys,
            provider_settings: self
                .providers
                .iter()
                .map(|(name, section)| (name.clone(), ProviderSetting::from(section)))
                .collect(),
            server_env: self.env.iter().collect::<Env>(),
        }
    }

    /// Copy with every secret replaced by [`REDACTED`].
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for key in copy.api_keys.values_mut() {
            *key = REDACTED.to_string();
        }
        for section in copy.providers.values_mut() {
            if section.api_key.is_some() {
                section.api_key = Some(REDACTED.to_string());
            }
        }
        for (name, value) in copy.env.iter_mut() {
            if looks_secret(name) {
                *value = REDACTED.to_string();
            }
        }
        copy
    }
}

fn looks_secret(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    upper.contains("KEY") || upper.contains("TOKEN") || upper.contains("SECRET")
}
