//! Per-provider cache of dynamically listed models.
//!
//! Each provider owns one [`DynamicModelCache`] holding at most one entry: the
//! last listing it fetched and the fingerprint of the credentials used to
//! fetch it. An entry is only served back to calls whose credentials produce
//! the same fingerprint; there is no time-based expiry.

use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{ModelInfo, ModelListOptions, ProviderSetting};

/// Compute the cache fingerprint for a provider.
///
/// The digest covers only what affects this provider's listing call: its own
/// `api_keys` entry, its own `provider_settings` entry, and the server
/// environment values for `env_keys`. The document is built with sorted keys,
/// so map insertion order never changes the result.
pub fn fingerprint(provider: &str, env_keys: &[&str], options: &ModelListOptions) -> String {
    let mut sorted_keys = env_keys.to_vec();
    sorted_keys.sort_unstable();
    sorted_keys.dedup();

    let server_env: Map<String, Value> = sorted_keys
        .into_iter()
        .filter_map(|key| {
            options
                .server_env
                .get(key)
                .map(|value| (key.to_string(), Value::from(value)))
        })
        .collect();

    let mut doc = Map::new();
    doc.insert("provider".into(), Value::from(provider));
    doc.insert(
        "apiKey".into(),
        options
            .api_keys
            .get(provider)
            .map_or(Value::Null, |key| Value::from(key.as_str())),
    );
    doc.insert(
        "settings".into(),
        options.setting(provider).map_or(Value::Null, setting_value),
    );
    doc.insert("serverEnv".into(), Value::Object(server_env));

    let digest = Sha256::digest(Value::Object(doc).to_string().as_bytes());
    hex::encode(digest)
}

fn setting_value(setting: &ProviderSetting) -> Value {
    let mut map = Map::new();
    map.insert("baseUrl".into(), setting.base_url.as_deref().into());
    map.insert("apiKey".into(), setting.api_key.as_deref().into());
    map.insert("enabled".into(), setting.enabled.into());
    let extra: Map<String, Value> = setting
        .extra
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
        .collect();
    map.insert("extra".into(), Value::Object(extra));
    Value::Object(map)
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fingerprint: String,
    models: Vec<ModelInfo>,
}

/// Single-entry model cache keyed by credential fingerprint.
///
/// Stores replace the whole entry under a write lock, so concurrent stores
/// resolve as last-write-wins and readers never observe a partial entry.
#[derive(Debug, Default)]
pub struct DynamicModelCache {
    entry: RwLock<Option<CacheEntry>>,
}

impl DynamicModelCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of the cached models if `fingerprint` matches the entry.
    pub fn get(&self, fingerprint: &str) -> Option<Vec<ModelInfo>> {
        let guard = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(entry) if entry.fingerprint == fingerprint => {
                debug!(models = entry.models.len(), "dynamic model cache hit");
                Some(entry.models.clone())
            }
            Some(_) => {
                debug!("dynamic model cache stale for current credentials");
                None
            }
            None => None,
        }
    }

    /// Replace the entry with `models` fetched under `fingerprint`.
    pub fn store(&self, fingerprint: String, models: Vec<ModelInfo>) {
        let mut guard = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CacheEntry {
            fingerprint,
            models,
        });
    }

    /// Fingerprint of the current entry, if any.
    pub fn current_fingerprint(&self) -> Option<String> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|entry| entry.fingerprint.clone())
    }

    /// Drop the current entry.
    pub fn clear(&self) {
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
