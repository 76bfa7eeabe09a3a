//! Model handle chat calls against mock vendor endpoints.

mod common;

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use bolt_models::providers::{
    ChatRequest, LlmProvider, Message, ModelInstanceRequest, Provider, StopReason, find_spec,
};
use bolt_models::{Env, Error, ModelListOptions, ProviderSetting};
use serde_json::{Value, json};

fn provider(name: &str) -> Provider {
    Provider::new(find_spec(name).unwrap(), Arc::new(Env::new()))
}

fn options(provider: &str, key: Option<&str>, base_url: String) -> ModelListOptions {
    let options = ModelListOptions::new()
        .with_provider_setting(provider, ProviderSetting::with_base_url(base_url));
    match key {
        Some(key) => options.with_api_key(provider, key),
        None => options,
    }
}

#[tokio::test]
async fn openai_compatible_chat_sends_bearer_and_messages() {
    let router = Router::new().route(
        "/chat/completions",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            if auth != "Bearer ds-key" || body["model"] != "deepseek-chat" {
                return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad request"})));
            }
            let echoed = body["messages"][1]["content"].clone();
            (
                StatusCode::OK,
                Json(json!({
                    "model": "deepseek-chat",
                    "choices": [{"message": {"role": "assistant", "content": echoed}, "finish_reason": "stop"}],
                    "usage": {"prompt_tokens": 5, "completion_tokens": 1}
                })),
            )
        }),
    );
    let url = common::serve(router).await;
    let options = options("Deepseek", Some("ds-key"), url);

    let handle = provider("Deepseek")
        .model_instance(ModelInstanceRequest {
            model: "deepseek-chat",
            options: &options,
        })
        .unwrap();
    let response = handle
        .chat(ChatRequest::new(vec![
            Message::system("echo"),
            Message::user("ping"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.content, "ping");
    assert_eq!(response.stop_reason, StopReason::EndTurn);
    assert_eq!(response.usage.total_tokens, 6);
}

#[tokio::test]
async fn anthropic_chat_uses_api_key_header() {
    let router = Router::new().route(
        "/messages",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let key_ok = headers.get("x-api-key").is_some_and(|v| v == "ant-key");
            let version_ok = headers.get("anthropic-version").is_some();
            if !key_ok || !version_ok || body["system"] != "be brief" {
                return (StatusCode::UNAUTHORIZED, Json(json!({"type": "error"})));
            }
            (
                StatusCode::OK,
                Json(json!({
                    "model": body["model"],
                    "content": [{"type": "text", "text": "hi"}],
                    "stop_reason": "max_tokens",
                    "usage": {"input_tokens": 3, "output_tokens": 1}
                })),
            )
        }),
    );
    let url = common::serve(router).await;
    let options = options("Anthropic", Some("ant-key"), url);

    let handle = provider("Anthropic")
        .model_instance(ModelInstanceRequest {
            model: "claude-3-5-haiku-latest",
            options: &options,
        })
        .unwrap();
    let response = handle
        .chat(ChatRequest::new(vec![
            Message::system("be brief"),
            Message::user("hello"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.content, "hi");
    assert_eq!(response.model, "claude-3-5-haiku-latest");
    assert_eq!(response.stop_reason, StopReason::MaxTokens);
}

#[tokio::test]
async fn ollama_chat_without_key() {
    let router = Router::new().route(
        "/api/chat",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["stream"], false);
            Json(json!({
                "model": body["model"],
                "message": {"role": "assistant", "content": "local reply"},
                "done": true,
                "prompt_eval_count": 4,
                "eval_count": 2
            }))
        }),
    );
    let url = common::serve(router).await;
    let options = options("Ollama", None, url);

    let handle = provider("Ollama")
        .model_instance(ModelInstanceRequest {
            model: "llama3",
            options: &options,
        })
        .unwrap();
    let response = handle
        .chat(ChatRequest::new(vec![Message::user("hello")]))
        .await
        .unwrap();

    assert_eq!(response.content, "local reply");
    assert_eq!(response.usage.input_tokens, 4);
}

#[tokio::test]
async fn vendor_error_status_maps_to_provider_api_error() {
    let url = common::failing_server().await;
    let options = options("OpenAI", Some("sk-test"), url);

    let handle = provider("OpenAI")
        .model_instance(ModelInstanceRequest {
            model: "gpt-4o",
            options: &options,
        })
        .unwrap();
    let err = handle
        .chat(ChatRequest::new(vec![Message::user("hello")]))
        .await
        .unwrap_err();

    match err {
        Error::ProviderApi(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_error() {
    let options = options("OpenAI", Some("sk-test"), "http://127.0.0.1:1".to_string());
    let handle = provider("OpenAI")
        .model_instance(ModelInstanceRequest {
            model: "gpt-4o",
            options: &options,
        })
        .unwrap();
    let err = handle
        .chat(ChatRequest::new(vec![Message::user("hello")]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Request(_)));
}

#[tokio::test]
async fn handles_send_through_the_provider_client() {
    let router = Router::new().route(
        "/chat/completions",
        post(|headers: HeaderMap| async move {
            let agent = headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            (
                StatusCode::OK,
                Json(json!({
                    "model": "gpt-4o",
                    "choices": [{"message": {"role": "assistant", "content": agent}, "finish_reason": "stop"}]
                })),
            )
        }),
    );
    let url = common::serve(router).await;
    let options = options("OpenAI", Some("sk-test"), url);

    let client = reqwest::Client::builder()
        .user_agent("bolt-shared-client")
        .build()
        .unwrap();
    let provider =
        Provider::with_client(find_spec("OpenAI").unwrap(), Arc::new(Env::new()), client);

    for _ in 0..2 {
        let handle = provider
            .model_instance(ModelInstanceRequest {
                model: "gpt-4o",
                options: &options,
            })
            .unwrap();
        let response = handle
            .chat(ChatRequest::new(vec![Message::user("hi")]))
            .await
            .unwrap();
        assert_eq!(response.content, "bolt-shared-client");
    }
}
