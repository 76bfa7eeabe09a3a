//! Ollama wire types: `/api/tags` listing and non-streaming `/api/chat`.

use serde::{Deserialize, Serialize};

use super::{ChatRequest, ChatResponse, StopReason, Usage, read_json};
use crate::{DEFAULT_MAX_TOKENS, ModelInfo, Result};

/// Response from Ollama's `/api/tags` endpoint.
#[derive(Debug, Deserialize)]
pub struct OllamaTagsResponse {
    pub models: Vec<OllamaModel>,
}

/// Model information from Ollama's API.
#[derive(Debug, Deserialize)]
pub struct OllamaModel {
    pub name: String,
    #[serde(default)]
    pub details: Option<OllamaModelDetails>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OllamaModelDetails {
    #[serde(default)]
    pub parameter_size: Option<String>,
}

impl OllamaModel {
    /// Convert to a `ModelInfo` owned by `provider`.
    pub fn to_model_info(&self, provider: &str) -> ModelInfo {
        let label = match self
            .details
            .as_ref()
            .and_then(|d| d.parameter_size.as_deref())
        {
            Some(size) => format!("{} ({size})", self.name),
            None => self.name.clone(),
        };
        ModelInfo::builder(provider, &self.name)
            .label(label)
            .max_token_allowed(DEFAULT_MAX_TOKENS)
            .build()
    }
}

/// Message in an Ollama chat request/response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for Ollama's `/api/chat` endpoint.
#[derive(Debug, Serialize)]
pub struct OllamaChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<OllamaChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaChatOptions>,
}

/// Chat options for Ollama.
#[derive(Debug, Serialize)]
pub struct OllamaChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

/// Response from Ollama's `/api/chat` endpoint.
#[derive(Debug, Deserialize)]
pub struct OllamaChatResponse {
    pub model: String,
    pub message: OllamaChatMessage,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
}

impl From<OllamaChatResponse> for ChatResponse {
    fn from(response: OllamaChatResponse) -> Self {
        Self {
            model: response.model,
            content: response.message.content,
            stop_reason: StopReason::from_vendor(response.done_reason.as_deref()),
            usage: Usage::new(
                response.prompt_eval_count.unwrap_or(0),
                response.eval_count.unwrap_or(0),
            ),
        }
    }
}

impl<'a> OllamaChatRequest<'a> {
    pub fn new(model: &'a str, request: &ChatRequest) -> Self {
        let messages = request
            .messages
            .iter()
            .map(|m| OllamaChatMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect();

        let options = (request.temperature.is_some() || request.max_tokens.is_some()).then(|| {
            OllamaChatOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            }
        });

        Self {
            model,
            messages,
            stream: false,
            options,
        }
    }
}

/// Fetch installed models from `/api/tags`.
pub(crate) async fn list_models(
    client: &reqwest::Client,
    provider: &str,
    base_url: &str,
) -> Result<Vec<ModelInfo>> {
    let response = client
        .get(format!("{base_url}/api/tags"))
        .timeout(super::DEFAULT_LISTING_TIMEOUT)
        .send()
        .await
        .map_err(|e| crate::Error::Request(e.to_string()))?;

    let tags: OllamaTagsResponse = read_json(response, provider).await?;
    Ok(tags
        .models
        .iter()
        .map(|m| m.to_model_info(provider))
        .collect())
}

/// Perform a chat completion against `/api/chat`.
pub(crate) async fn chat(
    client: &reqwest::Client,
    provider: &str,
    base_url: &str,
    model: &str,
    request: &ChatRequest,
) -> Result<ChatResponse> {
    let response = client
        .post(format!("{base_url}/api/chat"))
        .json(&OllamaChatRequest::new(model, request))
        .send()
        .await
        .map_err(|e| crate::Error::Request(e.to_string()))?;

    let ollama_response: OllamaChatResponse = read_json(response, provider).await?;
    Ok(ollama_response.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Message;

    #[test]
    fn parse_tags_response_extracts_models() {
        let json = r#"{
            "models": [
                {
                    "name": "llama3:latest",
                    "model": "llama3:latest",
                    "modified_at": "2024-01-15T10:00:00Z",
                    "size": 4661224676,
                    "digest": "abc123",
                    "details": {"family": "llama", "parameter_size": "8.0B"}
                },
                {
                    "name": "mistral:7b",
                    "model": "mistral:7b",
                    "modified_at": "2024-01-14T10:00:00Z",
                    "size": 4109865159,
                    "digest": "def456"
                }
            ]
        }"#;

        let response: OllamaTagsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.models.len(), 2);
        assert_eq!(response.models[0].name, "llama3:latest");
        assert_eq!(response.models[1].name, "mistral:7b");
    }

    #[test]
    fn ollama_model_label_includes_parameter_size() {
        let model = OllamaModel {
            name: "llama3:latest".to_string(),
            details: Some(OllamaModelDetails {
                parameter_size: Some("8.0B".to_string()),
            }),
        };

        let info = model.to_model_info("Ollama");
        assert_eq!(info.provider, "Ollama");
        assert_eq!(info.name, "llama3:latest");
        assert_eq!(info.label, "llama3:latest (8.0B)");
        assert_eq!(info.max_token_allowed, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn ollama_model_without_details_uses_name() {
        let model = OllamaModel {
            name: "mistral:7b".to_string(),
            details: None,
        };
        assert_eq!(model.to_model_info("Ollama").label, "mistral:7b");
    }

    #[test]
    fn chat_request_omits_empty_options() {
        let request = ChatRequest::new(vec![Message::user("hi")]);
        let body = serde_json::to_value(OllamaChatRequest::new("llama3", &request)).unwrap();
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("options").is_none());

        let request = request.max_tokens(64);
        let body = serde_json::to_value(OllamaChatRequest::new("llama3", &request)).unwrap();
        assert_eq!(body["options"]["num_predict"], 64);
    }

    #[test]
    fn parse_chat_response_extracts_content() {
        let json = r#"{
            "model": "llama3",
            "created_at": "2024-01-15T10:00:00Z",
            "message": {
                "role": "assistant",
                "content": "Hello! How can I help you today?"
            },
            "done": true,
            "done_reason": "stop",
            "prompt_eval_count": 10,
            "eval_count": 15
        }"#;

        let response: ChatResponse = serde_json::from_str::<OllamaChatResponse>(json)
            .unwrap()
            .into();
        assert_eq!(response.content, "Hello! How can I help you today?");
        assert_eq!(response.model, "llama3");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.input_tokens, 10);
        assert_eq!(response.usage.output_tokens, 15);
    }

    #[test]
    fn length_done_reason_maps_to_max_tokens() {
        let json = r#"{
            "model": "llama3",
            "message": {"role": "assistant", "content": "cut"},
            "done": true,
            "done_reason": "length"
        }"#;
        let response: ChatResponse = serde_json::from_str::<OllamaChatResponse>(json)
            .unwrap()
            .into();
        assert_eq!(response.stop_reason, StopReason::MaxTokens);
    }
}
