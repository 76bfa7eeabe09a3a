//! Credential resolution for providers.
//!
//! A provider's effective base URL and API key are resolved from four layered
//! sources. For the API key, first non-empty match wins:
//!
//! 1. `api_keys[provider]` supplied by the caller's stored settings
//! 2. `provider_settings[provider].api_key`
//! 3. the request's server environment, under the provider's token key
//! 4. the process environment bound to the registry, under the same key
//!
//! Base URLs follow the same order minus the first tier and fall back to the
//! vendor default. Resolution never fails: a missing key is reported as
//! `None` and the caller that actually builds a client decides whether that
//! is fatal.
//!
//! # Example
//!
//! ```
//! use bolt_models::auth::{ResolveRequest, resolve_base_url_and_key};
//! use bolt_models::{Env, ModelListOptions};
//!
//! let options = ModelListOptions::new()
//!     .with_api_key("Deepseek", "k1")
//!     .with_server_env("DEEPSEEK_API_KEY", "k2");
//! let process_env = Env::new();
//!
//! let resolved = resolve_base_url_and_key(ResolveRequest {
//!     provider: "Deepseek",
//!     options: &options,
//!     process_env: &process_env,
//!     base_url_key: None,
//!     api_token_key: Some("DEEPSEEK_API_KEY"),
//!     default_base_url: "https://api.deepseek.com/beta",
//! });
//! assert_eq!(resolved.api_key.unwrap().expose_secret(), "k1");
//! ```

mod store;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{Env, ModelListOptions};

pub use store::KeyringStore;

/// A secure API key that prevents accidental logging.
///
/// The key is wrapped in `SecretString` which:
/// - Implements `Debug` as `"[REDACTED]"`
/// - Zeroizes memory on drop
/// - Requires explicit `.expose_secret()` to access the value
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Create a new API key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Expose the secret key value.
    ///
    /// Use sparingly - only when actually sending to an API.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Which layer supplied a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// The caller's `api_keys` map.
    ApiKeys,
    /// The caller's per-provider settings.
    ProviderSettings,
    /// The request-scoped server environment.
    ServerEnv,
    /// The process environment bound to the registry.
    ProcessEnv,
    /// The vendor default compiled into the provider catalog.
    Default,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CredentialSource::ApiKeys => "api keys",
            CredentialSource::ProviderSettings => "provider settings",
            CredentialSource::ServerEnv => "server environment",
            CredentialSource::ProcessEnv => "process environment",
            CredentialSource::Default => "default",
        };
        f.write_str(label)
    }
}

/// Inputs for [`resolve_base_url_and_key`].
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    /// Provider name, used to index `api_keys` and `provider_settings`.
    pub provider: &'a str,
    /// Caller-supplied credential bundle.
    pub options: &'a ModelListOptions,
    /// Process environment bound at registry construction.
    pub process_env: &'a Env,
    /// Environment key that may carry a base URL.
    pub base_url_key: Option<&'a str>,
    /// Environment key that may carry the API key.
    pub api_token_key: Option<&'a str>,
    /// Vendor default base URL, possibly empty.
    pub default_base_url: &'a str,
}

/// Effective base URL and API key for one provider call.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    /// Base URL without trailing slash. Empty when nothing resolved.
    pub base_url: String,
    /// Resolved API key, if any source supplied one.
    pub api_key: Option<ApiKey>,
    /// Layer the API key came from.
    pub api_key_source: Option<CredentialSource>,
    /// Layer the base URL came from.
    pub base_url_source: CredentialSource,
}

/// Resolve the effective base URL and API key for a provider.
pub fn resolve_base_url_and_key(request: ResolveRequest<'_>) -> ResolvedCredentials {
    let ResolveRequest {
        provider,
        options,
        process_env,
        base_url_key,
        api_token_key,
        default_base_url,
    } = request;
    let setting = options.setting(provider);

    let api_key = non_empty(options.api_keys.get(provider).map(String::as_str))
        .map(|key| (key, CredentialSource::ApiKeys))
        .or_else(|| {
            non_empty(setting.and_then(|s| s.api_key.as_deref()))
                .map(|key| (key, CredentialSource::ProviderSettings))
        })
        .or_else(|| from_environments(api_token_key, &options.server_env, process_env));

    let (base_url, base_url_source) = non_empty(setting.and_then(|s| s.base_url.as_deref()))
        .map(|url| (url, CredentialSource::ProviderSettings))
        .or_else(|| from_environments(base_url_key, &options.server_env, process_env))
        .unwrap_or((default_base_url, CredentialSource::Default));

    debug!(
        provider,
        api_key_source = ?api_key.map(|(_, source)| source),
        base_url_source = %base_url_source,
        "resolved provider credentials"
    );

    ResolvedCredentials {
        base_url: strip_trailing_slash(base_url).to_string(),
        api_key: api_key.map(|(key, _)| ApiKey::new(key)),
        api_key_source: api_key.map(|(_, source)| source),
        base_url_source,
    }
}

/// Resolve a provider-specific extra setting such as a project id.
///
/// Order: `provider_settings[provider].extra[key]`, server environment,
/// process environment.
pub fn resolve_setting<'a>(
    provider: &str,
    key: &'a str,
    options: &'a ModelListOptions,
    process_env: &'a Env,
) -> Option<&'a str> {
    non_empty(
        options
            .setting(provider)
            .and_then(|s| s.extra.get(key))
            .map(String::as_str),
    )
    .or_else(|| from_environments(Some(key), &options.server_env, process_env).map(|(v, _)| v))
}

/// Remove every trailing `/` from a URL.
pub fn strip_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}

fn from_environments<'a>(
    key: Option<&str>,
    server_env: &'a Env,
    process_env: &'a Env,
) -> Option<(&'a str, CredentialSource)> {
    let key = key?;
    server_env
        .get(key)
        .map(|value| (value, CredentialSource::ServerEnv))
        .or_else(|| {
            process_env
                .get(key)
                .map(|value| (value, CredentialSource::ProcessEnv))
        })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderSetting;

    const PROVIDER: &str = "Deepseek";
    const TOKEN_KEY: &str = "DEEPSEEK_API_KEY";
    const BASE_KEY: &str = "DEEPSEEK_API_BASE_URL";
    const DEFAULT_URL: &str = "https://api.deepseek.com/beta";

    fn resolve(options: &ModelListOptions, process_env: &Env) -> ResolvedCredentials {
        resolve_base_url_and_key(ResolveRequest {
            provider: PROVIDER,
            options,
            process_env,
            base_url_key: Some(BASE_KEY),
            api_token_key: Some(TOKEN_KEY),
            default_base_url: DEFAULT_URL,
        })
    }

    fn key_of(resolved: &ResolvedCredentials) -> Option<&str> {
        resolved.api_key.as_ref().map(ApiKey::expose_secret)
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-secret-key-12345");
        let debug = format!("{:?}", key);
        assert_eq!(debug, "ApiKey([REDACTED])");
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn api_key_from_string() {
        let key: ApiKey = "my-key".into();
        assert_eq!(key.expose_secret(), "my-key");

        let key: ApiKey = String::from("my-key").into();
        assert_eq!(key.expose_secret(), "my-key");
    }

    #[test]
    fn api_keys_beat_server_env() {
        let options = ModelListOptions::new()
            .with_api_key(PROVIDER, "k1")
            .with_server_env(TOKEN_KEY, "k2");
        let resolved = resolve(&options, &Env::new());
        assert_eq!(key_of(&resolved), Some("k1"));
        assert_eq!(resolved.api_key_source, Some(CredentialSource::ApiKeys));
    }

    #[test]
    fn precedence_holds_for_every_subset_of_sources() {
        // Each bit enables one source; the highest enabled source must win.
        let names = ["api_keys", "settings", "server_env", "process_env"];
        for mask in 0u8..16 {
            let mut options = ModelListOptions::new();
            let mut process_env = Env::new();
            if mask & 1 != 0 {
                options = options.with_api_key(PROVIDER, "api_keys");
            }
            if mask & 2 != 0 {
                options = options.with_provider_setting(
                    PROVIDER,
                    ProviderSetting {
                        api_key: Some("settings".to_string()),
                        ..Default::default()
                    },
                );
            }
            if mask & 4 != 0 {
                options = options.with_server_env(TOKEN_KEY, "server_env");
            }
            if mask & 8 != 0 {
                process_env.insert(TOKEN_KEY, "process_env");
            }

            let expected = (0..4).find(|bit| mask & (1 << bit) != 0).map(|bit| names[bit]);
            let resolved = resolve(&options, &process_env);
            assert_eq!(key_of(&resolved), expected, "mask {mask:04b}");
        }
    }

    #[test]
    fn empty_values_fall_through() {
        let options = ModelListOptions::new()
            .with_api_key(PROVIDER, "")
            .with_server_env(TOKEN_KEY, "");
        let process_env = Env::new().with(TOKEN_KEY, "from-process");
        let resolved = resolve(&options, &process_env);
        assert_eq!(key_of(&resolved), Some("from-process"));
        assert_eq!(resolved.api_key_source, Some(CredentialSource::ProcessEnv));
    }

    #[test]
    fn missing_everywhere_yields_none() {
        let resolved = resolve(&ModelListOptions::new(), &Env::new());
        assert!(resolved.api_key.is_none());
        assert!(resolved.api_key_source.is_none());
        assert_eq!(resolved.base_url, DEFAULT_URL);
        assert_eq!(resolved.base_url_source, CredentialSource::Default);
    }

    #[test]
    fn other_providers_keys_are_ignored() {
        let options = ModelListOptions::new().with_api_key("OpenAI", "sk-openai");
        assert!(resolve(&options, &Env::new()).api_key.is_none());
    }

    #[test]
    fn settings_base_url_has_trailing_slash_stripped() {
        let options = ModelListOptions::new()
            .with_provider_setting(PROVIDER, ProviderSetting::with_base_url("https://x.com/"));
        let resolved = resolve(&options, &Env::new());
        assert_eq!(resolved.base_url, "https://x.com");
        assert_eq!(resolved.base_url_source, CredentialSource::ProviderSettings);
    }

    #[test]
    fn base_url_order_is_settings_server_process_default() {
        let process_env = Env::new().with(BASE_KEY, "https://process.example/");
        let options = ModelListOptions::new().with_server_env(BASE_KEY, "https://server.example//");

        let resolved = resolve(&options, &process_env);
        assert_eq!(resolved.base_url, "https://server.example");

        let resolved = resolve(&ModelListOptions::new(), &process_env);
        assert_eq!(resolved.base_url, "https://process.example");
        assert_eq!(resolved.base_url_source, CredentialSource::ProcessEnv);
    }

    #[test]
    fn resolve_setting_prefers_provider_extras() {
        let mut setting = ProviderSetting::default();
        setting
            .extra
            .insert("GOOGLE_VERTEX_PROJECT".to_string(), "from-settings".to_string());
        let options = ModelListOptions::new()
            .with_provider_setting("Vertex", setting)
            .with_server_env("GOOGLE_VERTEX_PROJECT", "from-server");
        let process_env = Env::new().with("GOOGLE_VERTEX_LOCATION", "us-central1");

        assert_eq!(
            resolve_setting("Vertex", "GOOGLE_VERTEX_PROJECT", &options, &process_env),
            Some("from-settings")
        );
        assert_eq!(
            resolve_setting("Vertex", "GOOGLE_VERTEX_LOCATION", &options, &process_env),
            Some("us-central1")
        );
        assert_eq!(
            resolve_setting("Vertex", "UNSET", &options, &process_env),
            None
        );
    }
}
