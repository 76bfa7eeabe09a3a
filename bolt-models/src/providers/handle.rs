//! Configured, ready-to-call model client.

use tracing::debug;

use super::{ChatRequest, ChatResponse, WireFormat, anthropic, ollama, openai};
use crate::Result;
use crate::auth::ApiKey;

/// A model bound to resolved credentials and an endpoint.
///
/// Returned by [`LlmProvider::model_instance`](super::LlmProvider::model_instance).
/// Cloning is cheap; the HTTP client is shared.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    provider: String,
    model: String,
    base_url: String,
    api_key: Option<ApiKey>,
    wire: WireFormat,
    client: reqwest::Client,
}

impl ModelHandle {
    /// Create a handle that sends requests through `client`.
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<ApiKey>,
        wire: WireFormat,
        client: reqwest::Client,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            base_url: base_url.into(),
            api_key,
            wire,
            client,
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn wire_format(&self) -> WireFormat {
        self.wire
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send a one-shot, non-streaming chat completion.
    ///
    /// # Errors
    ///
    /// `Error::Request` on transport failure, `Error::ProviderApi` when the
    /// vendor answers with a non-success status, and `Error::Serialization`
    /// when the body cannot be decoded.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        debug!(
            provider = %self.provider,
            model = %self.model,
            messages = request.messages.len(),
            "sending chat request"
        );
        let (client, provider, base_url) = (&self.client, &self.provider, &self.base_url);
        let key = self.api_key.as_ref();
        match self.wire {
            WireFormat::OpenAi => {
                openai::chat(client, provider, base_url, key, &self.model, &request).await
            }
            WireFormat::Anthropic => {
                anthropic::chat(client, provider, base_url, key, &self.model, &request).await
            }
            WireFormat::Ollama => {
                ollama::chat(client, provider, base_url, &self.model, &request).await
            }
        }
    }
}
