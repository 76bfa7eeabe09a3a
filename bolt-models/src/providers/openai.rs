//! OpenAI-compatible wire: `/models` listing and `/chat/completions`.
//!
//! Most vendors in the catalog speak this protocol. Listings differ in where
//! they put the context length, so every known field is read and the first
//! present one wins.

use serde::{Deserialize, Serialize};

use super::{ChatRequest, ChatResponse, StopReason, Usage, read_body, read_json};
use crate::auth::ApiKey;
use crate::{DEFAULT_MAX_TOKENS, Error, ModelInfo, Result};

/// Substrings of model ids that never serve chat completions.
const NON_CHAT_MARKERS: &[&str] = &[
    "embed",
    "whisper",
    "tts",
    "dall-e",
    "moderation",
    "transcribe",
];

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    context_length: Option<u64>,
    #[serde(default)]
    context_window: Option<u64>,
    #[serde(default)]
    max_context_length: Option<u64>,
}

impl ModelEntry {
    fn is_chat(&self) -> bool {
        if let Some(kind) = &self.kind {
            return kind == "chat";
        }
        let id = self.id.to_ascii_lowercase();
        !NON_CHAT_MARKERS.iter().any(|marker| id.contains(marker))
    }

    fn to_model_info(&self, provider: &str) -> ModelInfo {
        let name = self.id.strip_prefix("models/").unwrap_or(&self.id);
        let label = self
            .display_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(name);
        let tokens = self
            .context_length
            .or(self.context_window)
            .or(self.max_context_length)
            .map_or(DEFAULT_MAX_TOKENS, |n| {
                u32::try_from(n).unwrap_or(u32::MAX)
            });
        ModelInfo::builder(provider, name)
            .label(label)
            .max_token_allowed(tokens)
            .build()
    }
}

/// Parse a `{"data": [...]}` listing body.
pub(crate) fn parse_model_list(provider: &str, body: &str) -> Result<Vec<ModelInfo>> {
    let list: ModelList = serde_json::from_str(body)?;
    Ok(into_models(provider, list.data))
}

/// Parse a bare-array listing body as returned by Together.
pub(crate) fn parse_model_array(provider: &str, body: &str) -> Result<Vec<ModelInfo>> {
    let entries: Vec<ModelEntry> = serde_json::from_str(body)?;
    Ok(into_models(provider, entries))
}

fn into_models(provider: &str, entries: Vec<ModelEntry>) -> Vec<ModelInfo> {
    entries
        .iter()
        .filter(|entry| entry.is_chat())
        .map(|entry| entry.to_model_info(provider))
        .collect()
}

/// Fetch `GET {base_url}/models`. `bare_array` selects the Together shape.
pub(crate) async fn list_models(
    client: &reqwest::Client,
    provider: &str,
    base_url: &str,
    api_key: Option<&ApiKey>,
    bare_array: bool,
) -> Result<Vec<ModelInfo>> {
    let mut request = client
        .get(format!("{base_url}/models"))
        .timeout(super::DEFAULT_LISTING_TIMEOUT);
    if let Some(key) = api_key {
        request = request.bearer_auth(key.expose_secret());
    }
    let response = request
        .send()
        .await
        .map_err(|e| Error::Request(e.to_string()))?;

    let body = read_body(response, provider).await?;
    if bare_array {
        parse_model_array(provider, &body)
    } else {
        parse_model_list(provider, &body)
    }
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

impl<'a> CompletionRequest<'a> {
    fn new(model: &'a str, request: &'a ChatRequest) -> Self {
        Self {
            model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CompletionUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

fn into_chat_response(response: CompletionResponse, model: &str) -> Result<ChatResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::ProviderApi("completion returned no choices".to_string()))?;
    let usage = response.usage.unwrap_or_default();
    Ok(ChatResponse {
        model: response.model.unwrap_or_else(|| model.to_string()),
        content: choice.message.content.unwrap_or_default(),
        stop_reason: StopReason::from_vendor(choice.finish_reason.as_deref()),
        usage: Usage::new(usage.prompt_tokens, usage.completion_tokens),
    })
}

/// Perform a chat completion against `{base_url}/chat/completions`.
pub(crate) async fn chat(
    client: &reqwest::Client,
    provider: &str,
    base_url: &str,
    api_key: Option<&ApiKey>,
    model: &str,
    request: &ChatRequest,
) -> Result<ChatResponse> {
    let mut http = client
        .post(format!("{base_url}/chat/completions"))
        .json(&CompletionRequest::new(model, request));
    if let Some(key) = api_key {
        http = http.bearer_auth(key.expose_secret());
    }
    let response = http
        .send()
        .await
        .map_err(|e| Error::Request(e.to_string()))?;

    let completion: CompletionResponse = read_json(response, provider).await?;
    into_chat_response(completion, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Message;

    #[test]
    fn parses_openrouter_listing_with_context_length() {
        let body = r#"{"data": [
            {"id": "anthropic/claude-3.5-sonnet", "name": "Anthropic: Claude 3.5 Sonnet", "context_length": 200000},
            {"id": "openai/gpt-4o-mini", "context_length": 128000}
        ]}"#;
        let models = parse_model_list("OpenRouter", body).unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].label, "Anthropic: Claude 3.5 Sonnet");
        assert_eq!(models[0].max_token_allowed, 200_000);
        assert_eq!(models[1].label, "openai/gpt-4o-mini");
        assert!(models.iter().all(|m| m.provider == "OpenRouter"));
    }

    #[test]
    fn groq_context_window_is_used() {
        let body = r#"{"object": "list", "data": [
            {"id": "llama-3.3-70b-versatile", "object": "model", "context_window": 32768}
        ]}"#;
        let models = parse_model_list("Groq", body).unwrap();
        assert_eq!(models[0].max_token_allowed, 32768);
    }

    #[test]
    fn missing_context_defaults() {
        let body = r#"{"data": [{"id": "gpt-4o", "object": "model"}]}"#;
        let models = parse_model_list("OpenAI", body).unwrap();
        assert_eq!(models[0].max_token_allowed, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn non_chat_models_are_dropped() {
        let body = r#"{"data": [
            {"id": "gpt-4o"},
            {"id": "text-embedding-3-small"},
            {"id": "whisper-1"},
            {"id": "dall-e-3"}
        ]}"#;
        let models = parse_model_list("OpenAI", body).unwrap();
        let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["gpt-4o"]);
    }

    #[test]
    fn google_model_prefix_is_stripped() {
        let body = r#"{"data": [{"id": "models/gemini-1.5-flash"}]}"#;
        let models = parse_model_list("Google", body).unwrap();
        assert_eq!(models[0].name, "gemini-1.5-flash");
    }

    #[test]
    fn together_array_keeps_chat_type_only() {
        let body = r#"[
            {"id": "Qwen/Qwen2.5-72B-Instruct-Turbo", "display_name": "Qwen 2.5 72B", "type": "chat", "context_length": 32768},
            {"id": "BAAI/bge-large-en-v1.5", "type": "embedding"},
            {"id": "black-forest-labs/FLUX.1-schnell", "type": "image"}
        ]"#;
        let models = parse_model_array("Together", body).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].label, "Qwen 2.5 72B");
        assert_eq!(models[0].max_token_allowed, 32768);
    }

    #[test]
    fn malformed_listing_is_an_error() {
        assert!(parse_model_list("OpenAI", r#"{"models": []}"#).is_err());
        assert!(parse_model_array("Together", r#"{"data": []}"#).is_err());
    }

    #[test]
    fn completion_request_shape() {
        let request = ChatRequest::new(vec![Message::system("be brief"), Message::user("hi")])
            .temperature(0.2);
        let body = serde_json::to_value(CompletionRequest::new("gpt-4o", &request)).unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn completion_response_maps_to_chat_response() {
        let json = r#"{
            "id": "chatcmpl-1",
            "model": "gpt-4o-2024-08-06",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello"}, "finish_reason": "length"}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 2, "total_tokens": 11}
        }"#;
        let response = into_chat_response(serde_json::from_str(json).unwrap(), "gpt-4o").unwrap();
        assert_eq!(response.model, "gpt-4o-2024-08-06");
        assert_eq!(response.content, "Hello");
        assert_eq!(response.stop_reason, StopReason::MaxTokens);
        assert_eq!(response.usage.total_tokens, 11);
    }

    #[test]
    fn empty_choices_is_an_error() {
        let json = r#"{"choices": []}"#;
        let err = into_chat_response(serde_json::from_str(json).unwrap(), "m").unwrap_err();
        assert!(matches!(err, Error::ProviderApi(_)));
    }
}
