//! Core types for model metadata.

use serde::{Deserialize, Serialize};

/// Context budget used when a vendor listing does not report one.
pub const DEFAULT_MAX_TOKENS: u32 = 8000;

/// Information about one selectable model.
///
/// Serialized with camelCase field names so it can be handed to the browser
/// client unchanged.
///
/// # Examples
///
/// ```
/// use bolt_models::ModelInfo;
///
/// let info = ModelInfo::builder("Deepseek", "deepseek-chat")
///     .label("Deepseek-Chat")
///     .max_token_allowed(8000)
///     .build();
/// assert_eq!(info.provider, "Deepseek");
/// assert_eq!(info.label, "Deepseek-Chat");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Vendor model id, unique within its provider.
    pub name: String,
    /// Human-readable display name.
    pub label: String,
    /// Name of the provider that serves this model.
    pub provider: String,
    /// Context budget in tokens. Always positive.
    pub max_token_allowed: u32,
}

impl ModelInfo {
    /// Create a new model info builder.
    pub fn builder(provider: &str, name: &str) -> ModelInfoBuilder {
        ModelInfoBuilder::new(provider, name)
    }
}

/// Builder for constructing `ModelInfo`.
#[derive(Debug)]
pub struct ModelInfoBuilder {
    provider: String,
    name: String,
    label: Option<String>,
    max_token_allowed: u32,
}

impl ModelInfoBuilder {
    fn new(provider: &str, name: &str) -> Self {
        Self {
            provider: provider.to_string(),
            name: name.to_string(),
            label: None,
            max_token_allowed: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the display label. Defaults to the model name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the context budget. Zero is raised to one.
    pub fn max_token_allowed(mut self, tokens: u32) -> Self {
        self.max_token_allowed = tokens.max(1);
        self
    }

    /// Build the `ModelInfo`.
    pub fn build(self) -> ModelInfo {
        ModelInfo {
            label: self.label.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            provider: self.provider,
            max_token_allowed: self.max_token_allowed,
        }
    }
}

/// Merge a provider's static models with its dynamically listed ones.
///
/// Dynamic entries replace static entries with the same name in place; new
/// names are appended in listing order. Repeated names inside `dynamic` keep
/// their first occurrence.
pub fn merge_models(static_models: &[ModelInfo], dynamic: &[ModelInfo]) -> Vec<ModelInfo> {
    let mut merged = static_models.to_vec();
    let mut seen_dynamic = std::collections::HashSet::new();

    for model in dynamic {
        if !seen_dynamic.insert(model.name.as_str()) {
            continue;
        }
        match merged.iter_mut().find(|m| m.name == model.name) {
            Some(existing) => *existing = model.clone(),
            None => merged.push(model.clone()),
        }
    }

    merged
}
