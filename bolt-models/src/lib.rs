//! Provider layer for bolt.
//!
//! This crate provides:
//! - A catalog of LLM vendors and a trait for adding more
//! - Layered credential resolution (caller keys, settings, server env, process env)
//! - Dynamic model listing with a per-provider, credential-keyed cache
//! - A registry that aggregates models across providers
//! - Keyring storage for API keys
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   ModelRegistry                      │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  │
//! │  │  Anthropic  │  │  Deepseek   │  │   Ollama    │  │
//! │  │  Provider   │  │  Provider   │  │  Provider   │  │
//! │  └─────────────┘  └─────────────┘  └─────────────┘  │
//! └─────────────────────────────────────────────────────┘
//!          │                                  │
//!          ▼                                  ▼
//! ┌──────────────────────────┐   ┌──────────────────────┐
//! │   Credential resolution  │   │  DynamicModelCache   │
//! │ api_keys > settings >    │   │ (SHA-256 fingerprint │
//! │ server env > process env │   │  of credentials)     │
//! └──────────────────────────┘   └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use bolt_models::{Env, ModelListOptions, ModelRegistry};
//!
//! # async fn run() {
//! let registry = ModelRegistry::new(Env::from_process());
//! let options = ModelListOptions::new().with_api_key("OpenAI", "sk-...");
//!
//! for model in registry.update_model_list(&options).await {
//!     println!("{}/{} ({})", model.provider, model.name, model.label);
//! }
//! # }
//! ```

mod error;
mod settings;
mod types;

pub mod auth;
pub mod cache;
pub mod providers;
pub mod registry;

pub use error::{Error, Result};
pub use registry::{ModelRegistry, ProviderInfo};
pub use settings::{Env, ModelListOptions, ProviderSetting};
pub use types::{DEFAULT_MAX_TOKENS, ModelInfo, ModelInfoBuilder, merge_models};
