//! Shared helpers for integration tests: mock vendor servers.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;

/// Start `router` on an ephemeral port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// An OpenAI-style `/models` endpoint that counts its hits.
pub async fn counting_models_server(body: &'static str) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let router = Router::new().route(
        "/models",
        get(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (
                    StatusCode::OK,
                    [("content-type", "application/json")],
                    body,
                )
            }
        }),
    );
    (serve(router).await, hits)
}

/// An OpenAI-style `/models` endpoint that waits `delay` before answering.
pub async fn slow_models_server(body: &'static str, delay: Duration) -> String {
    let router = Router::new().route(
        "/models",
        get(move || async move {
            tokio::time::sleep(delay).await;
            (
                StatusCode::OK,
                [("content-type", "application/json")],
                body,
            )
        }),
    );
    serve(router).await
}

/// A server whose every route answers 500.
pub async fn failing_server() -> String {
    let router = Router::new().fallback(|| async {
        (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
    });
    serve(router).await
}
