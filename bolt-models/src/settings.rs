//! Per-call credential inputs: API keys, provider settings and environments.
//!
//! None of these are persisted here. Callers assemble a [`ModelListOptions`]
//! from whatever they store (cookies, config files, keyring) and pass it to
//! providers and the registry.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A snapshot of environment variables.
///
/// Used both for the request-scoped server environment and for the process
/// environment bound to a registry at construction. Empty values are treated
/// as unset by [`Env::get`].
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(BTreeMap<String, String>);

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    /// Look up a variable, ignoring empty values.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Set a variable, returning the updated environment.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a variable.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Overlay another environment on top of this one.
    pub fn extend(&mut self, other: Env) {
        self.0.extend(other.0);
    }

    /// Whether no variables are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// Values are frequently secrets, so only the names are printed.
impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Per-provider override supplied by the caller, e.g. a self-hosted endpoint.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSetting {
    /// Base URL override.
    #[serde(default, alias = "base_url", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// API key supplied alongside the settings.
    #[serde(default, alias = "api_key", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Whether the provider participates in model listing. Defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Provider-specific extras such as a project id or region.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, String>,
}

impl ProviderSetting {
    /// Settings carrying only a base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    /// Whether the provider is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

impl fmt::Debug for ProviderSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSetting")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("enabled", &self.enabled)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The credential bundle passed to every provider and registry call.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelListOptions {
    /// Provider name to API key. Highest precedence.
    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,
    /// Provider name to settings override.
    #[serde(default)]
    pub provider_settings: BTreeMap<String, ProviderSetting>,
    /// Request or server scoped environment.
    #[serde(default)]
    pub server_env: Env,
}

impl ModelListOptions {
    /// Create an empty options bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an API key for a provider.
    pub fn with_api_key(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_keys.insert(provider.into(), key.into());
        self
    }

    /// Add a settings override for a provider.
    pub fn with_provider_setting(
        mut self,
        provider: impl Into<String>,
        setting: ProviderSetting,
    ) -> Self {
        self.provider_settings.insert(provider.into(), setting);
        self
    }

    /// Add a server environment variable.
    pub fn with_server_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.server_env.insert(key, value);
        self
    }

    /// Settings for a provider, if any.
    pub fn setting(&self, provider: &str) -> Option<&ProviderSetting> {
        self.provider_settings.get(provider)
    }

    /// Whether a provider is enabled. Providers without settings are enabled.
    pub fn is_enabled(&self, provider: &str) -> bool {
        self.setting(provider).is_none_or(ProviderSetting::is_enabled)
    }
}

impl fmt::Debug for ModelListOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelListOptions")
            .field("api_keys", &self.api_keys.keys().collect::<Vec<_>>())
            .field("provider_settings", &self.provider_settings)
            .field("server_env", &self.server_env)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_get_ignores_empty_values() {
        let env = Env::new().with("SET", "value").with("EMPTY", "");
        assert_eq!(env.get("SET"), Some("value"));
        assert_eq!(env.get("EMPTY"), None);
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn env_debug_hides_values() {
        let env = Env::new().with("OPENAI_API_KEY", "sk-secret");
        let debug = format!("{env:?}");
        assert!(debug.contains("OPENAI_API_KEY"));
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn env_extend_overlays() {
        let mut base = Env::new().with("A", "1").with("B", "1");
        base.extend(Env::new().with("B", "2"));
        assert_eq!(base.get("A"), Some("1"));
        assert_eq!(base.get("B"), Some("2"));
    }

    #[test]
    fn provider_setting_enabled_by_default() {
        assert!(ProviderSetting::default().is_enabled());
        let disabled = ProviderSetting {
            enabled: Some(false),
            ..Default::default()
        };
        assert!(!disabled.is_enabled());
    }

    #[test]
    fn provider_setting_accepts_both_key_styles() {
        let camel: ProviderSetting =
            serde_json::from_str(r#"{"baseUrl":"http://a","enabled":true}"#).unwrap();
        let snake: ProviderSetting = serde_json::from_str(r#"{"base_url":"http://a"}"#).unwrap();
        assert_eq!(camel.base_url.as_deref(), Some("http://a"));
        assert_eq!(snake.base_url.as_deref(), Some("http://a"));
    }

    #[test]
    fn provider_setting_collects_extras() {
        let setting: ProviderSetting =
            serde_json::from_str(r#"{"GOOGLE_VERTEX_PROJECT":"my-project"}"#).unwrap();
        assert_eq!(
            setting.extra.get("GOOGLE_VERTEX_PROJECT").map(String::as_str),
            Some("my-project")
        );
    }

    #[test]
    fn options_enabled_defaults_to_true() {
        let options = ModelListOptions::new().with_provider_setting(
            "Ollama",
            ProviderSetting {
                enabled: Some(false),
                ..Default::default()
            },
        );
        assert!(!options.is_enabled("Ollama"));
        assert!(options.is_enabled("OpenAI"));
    }

    #[test]
    fn options_debug_hides_keys() {
        let options = ModelListOptions::new().with_api_key("OpenAI", "sk-secret");
        assert!(!format!("{options:?}").contains("sk-secret"));
    }
}
