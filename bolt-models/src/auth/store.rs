//! System keyring storage for caller-side API keys.
//!
//! Keys stored here feed the highest-precedence `api_keys` tier of
//! [`ModelListOptions`](crate::ModelListOptions). Environment variables are
//! not read here; they are later resolution tiers of their own.

use std::collections::{BTreeMap, HashMap, hash_map};
use std::sync::{Mutex, PoisonError};

use keyring::Entry;
use tracing::debug;

use super::ApiKey;
use crate::{Error, Result};

/// API keys kept in the operating system keyring, one entry per provider.
///
/// The platform backend is chosen at build time: macOS keychain, Windows
/// credential manager, or the Linux kernel keyring. Other targets fall back
/// to an in-memory store that lives as long as this value.
///
/// # Thread Safety
///
/// Entries are opened once per provider and reused behind a mutex, so
/// concurrent calls on one store see each other's writes.
pub struct KeyringStore {
    service_name: String,
    entries: Mutex<HashMap<String, Entry>>,
}

impl KeyringStore {
    /// Create a store under the given keyring service (e.g., "bolt").
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Keyring service name.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Get the API key stored for a provider.
    ///
    /// # Errors
    ///
    /// Returns `Error::CredentialsNotFound` if nothing is stored.
    pub fn get(&self, provider: &str) -> Result<ApiKey> {
        match self.with_entry(provider, Entry::get_password)? {
            Ok(key) if !key.is_empty() => {
                debug!(provider, "retrieved API key from keyring");
                Ok(ApiKey::new(key))
            }
            Ok(_) | Err(keyring::Error::NoEntry) => {
                Err(Error::CredentialsNotFound(provider.to_string()))
            }
            Err(e) => Err(Error::Keyring(e.to_string())),
        }
    }

    /// Store an API key for a provider.
    ///
    /// # Errors
    ///
    /// Returns `Error::Keyring` if the keyring operation fails.
    pub fn set(&self, provider: &str, key: &str) -> Result<()> {
        self.with_entry(provider, |entry| entry.set_password(key))?
            .map_err(|e| Error::Keyring(e.to_string()))?;
        debug!(provider, "stored API key in keyring");
        Ok(())
    }

    /// Delete the API key stored for a provider.
    ///
    /// # Errors
    ///
    /// Returns `Error::CredentialsNotFound` if no key exists, or
    /// `Error::Keyring` if the keyring operation fails.
    pub fn delete(&self, provider: &str) -> Result<()> {
        self.with_entry(provider, Entry::delete_credential)?
            .map_err(|e| match e {
                keyring::Error::NoEntry => Error::CredentialsNotFound(provider.to_string()),
                _ => Error::Keyring(e.to_string()),
            })?;
        debug!(provider, "deleted API key from keyring");
        Ok(())
    }

    /// Collect stored keys for the given providers into an `api_keys` map.
    ///
    /// Providers without a stored key, or whose lookup fails, are skipped.
    pub fn load_api_keys<'a>(
        &self,
        providers: impl IntoIterator<Item = &'a str>,
    ) -> BTreeMap<String, String> {
        providers
            .into_iter()
            .filter_map(|provider| {
                self.get(provider)
                    .ok()
                    .map(|key| (provider.to_string(), key.expose_secret().to_string()))
            })
            .collect()
    }

    fn with_entry<T>(&self, provider: &str, op: impl FnOnce(&Entry) -> T) -> Result<T> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = match entries.entry(provider.to_string()) {
            hash_map::Entry::Occupied(slot) => slot.into_mut(),
            hash_map::Entry::Vacant(slot) => slot.insert(
                Entry::new(&self.service_name, provider)
                    .map_err(|e| Error::Keyring(e.to_string()))?,
            ),
        };
        Ok(op(entry))
    }
}
