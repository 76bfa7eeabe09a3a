//! Error types for the provider layer.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving providers or talking to vendors.
#[derive(Debug, Error)]
pub enum Error {
    /// No API key resolved from any source when one is required.
    #[error("Missing API key for {provider} provider")]
    MissingApiKey { provider: String },

    /// The resolved base URL is empty and the provider has no default.
    #[error("Missing base URL for {provider} provider")]
    MissingBaseUrl { provider: String },

    /// A provider-specific setting (project id, region, ...) did not resolve.
    #[error("Missing {key} setting for {provider} provider")]
    MissingSetting { provider: String, key: String },

    /// Provider not found in registry.
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    /// Provider has no model-listing endpoint.
    #[error("dynamic model listing not supported by provider: {0}")]
    DynamicModelsUnsupported(String),

    /// Credentials not found in the keyring.
    #[error("credentials not found for provider: {0}")]
    CredentialsNotFound(String),

    /// Failed to access system keyring.
    #[error("keyring error: {0}")]
    Keyring(String),

    /// Provider API error.
    #[error("provider API error: {0}")]
    ProviderApi(String),

    /// Request failed.
    #[error("request failed: {0}")]
    Request(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error means the caller has not configured the provider,
    /// as opposed to the vendor failing.
    pub fn is_missing_credential(&self) -> bool {
        matches!(
            self,
            Error::MissingApiKey { .. }
                | Error::MissingBaseUrl { .. }
                | Error::MissingSetting { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_names_provider() {
        let err = Error::MissingApiKey {
            provider: "Deepseek".to_string(),
        };
        assert_eq!(err.to_string(), "Missing API key for Deepseek provider");
        assert!(err.is_missing_credential());
    }

    #[test]
    fn missing_setting_names_key() {
        let err = Error::MissingSetting {
            provider: "Vertex".to_string(),
            key: "GOOGLE_VERTEX_PROJECT".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing GOOGLE_VERTEX_PROJECT setting for Vertex provider"
        );
    }

    #[test]
    fn upstream_errors_are_not_missing_credentials() {
        assert!(!Error::ProviderApi("boom".to_string()).is_missing_credential());
        assert!(!Error::ProviderNotFound("nope".to_string()).is_missing_credential());
    }

    #[test]
    fn error_from_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
