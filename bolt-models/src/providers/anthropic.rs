//! Anthropic wire: `/models` listing and `/messages`.

use serde::{Deserialize, Serialize};

use super::{ChatRequest, ChatResponse, StopReason, Usage, read_json};
use crate::auth::ApiKey;
use crate::{DEFAULT_MAX_TOKENS, Error, ModelInfo, Result};

/// API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// `max_tokens` is mandatory on this API; used when the request has none.
const DEFAULT_RESPONSE_TOKENS: u32 = 4096;

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
}

pub(crate) fn parse_model_list(provider: &str, body: &str) -> Result<Vec<ModelInfo>> {
    let list: ModelList = serde_json::from_str(body)?;
    Ok(list
        .data
        .iter()
        .map(|entry| {
            ModelInfo::builder(provider, &entry.id)
                .label(entry.display_name.as_deref().unwrap_or(&entry.id))
                .max_token_allowed(DEFAULT_MAX_TOKENS)
                .build()
        })
        .collect())
}

fn with_auth(
    request: reqwest::RequestBuilder,
    api_key: Option<&ApiKey>,
) -> reqwest::RequestBuilder {
    let request = request.header("anthropic-version", ANTHROPIC_VERSION);
    match api_key {
        Some(key) => request.header("x-api-key", key.expose_secret()),
        None => request,
    }
}

/// Fetch `GET {base_url}/models`.
pub(crate) async fn list_models(
    client: &reqwest::Client,
    provider: &str,
    base_url: &str,
    api_key: Option<&ApiKey>,
) -> Result<Vec<ModelInfo>> {
    let request = client
        .get(format!("{base_url}/models"))
        .timeout(super::DEFAULT_LISTING_TIMEOUT);
    let response = with_auth(request, api_key)
        .send()
        .await
        .map_err(|e| Error::Request(e.to_string()))?;

    let body = super::read_body(response, provider).await?;
    parse_model_list(provider, &body)
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl<'a> MessagesRequest<'a> {
    fn new(model: &'a str, request: &'a ChatRequest) -> Self {
        let (system, rest) = request.split_system();
        Self {
            model,
            system,
            messages: rest
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_RESPONSE_TOKENS),
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    model: String,
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    usage: MessagesUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MessagesUsage {
    input_tokens: u64,
    output_tokens: u64,
}

impl From<MessagesResponse> for ChatResponse {
    fn from(response: MessagesResponse) -> Self {
        let content = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");
        Self {
            model: response.model,
            content,
            stop_reason: StopReason::from_vendor(response.stop_reason.as_deref()),
            usage: Usage::new(response.usage.input_tokens, response.usage.output_tokens),
        }
    }
}

/// Perform a chat completion against `{base_url}/messages`.
pub(crate) async fn chat(
    client: &reqwest::Client,
    provider: &str,
    base_url: &str,
    api_key: Option<&ApiKey>,
    model: &str,
    request: &ChatRequest,
) -> Result<ChatResponse> {
    let http = client
        .post(format!("{base_url}/messages"))
        .json(&MessagesRequest::new(model, request));
    let response = with_auth(http, api_key)
        .send()
        .await
        .map_err(|e| Error::Request(e.to_string()))?;

    let messages: MessagesResponse = read_json(response, provider).await?;
    Ok(messages.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Message;

    #[test]
    fn parses_model_listing() {
        let body = r#"{
            "data": [
                {"type": "model", "id": "claude-3-5-sonnet-20241022", "display_name": "Claude 3.5 Sonnet (New)", "created_at": "2024-10-22T00:00:00Z"},
                {"type": "model", "id": "claude-3-haiku-20240307"}
            ],
            "has_more": false
        }"#;
        let models = parse_model_list("Anthropic", body).unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].label, "Claude 3.5 Sonnet (New)");
        assert_eq!(models[1].label, "claude-3-haiku-20240307");
        assert_eq!(models[1].max_token_allowed, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn system_message_moves_to_top_level() {
        let request = ChatRequest::new(vec![Message::system("be brief"), Message::user("hi")]);
        let body = serde_json::to_value(MessagesRequest::new("claude", &request)).unwrap();
        assert_eq!(body["system"], "be brief");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["max_tokens"], DEFAULT_RESPONSE_TOKENS);
    }

    #[test]
    fn explicit_max_tokens_is_kept() {
        let request = ChatRequest::new(vec![Message::user("hi")]).max_tokens(100);
        let body = serde_json::to_value(MessagesRequest::new("claude", &request)).unwrap();
        assert_eq!(body["max_tokens"], 100);
        assert!(body.get("system").is_none());
    }

    #[test]
    fn response_joins_text_blocks() {
        let json = r#"{
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-sonnet-20241022",
            "content": [
                {"type": "text", "text": "Hello"},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
                {"type": "text", "text": " world"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 3}
        }"#;
        let response: ChatResponse = serde_json::from_str::<MessagesResponse>(json)
            .unwrap()
            .into();
        assert_eq!(response.content, "Hello world");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.total_tokens, 15);
    }
}
