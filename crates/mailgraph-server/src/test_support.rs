//! Helpers shared by unit tests.

use std::net::SocketAddr;

use axum::Router;

use mailgraph_core::config::LlmSettings;

/// Serve `app` on an ephemeral local port and return its base URL
/// (`http://127.0.0.1:PORT/v1`).
pub async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

/// LLM settings pointing at a fake upstream, default allow-list.
pub fn llm_settings(base_url: String, timeout_secs: u64) -> LlmSettings {
    LlmSettings {
        api_key: "sk-test".to_string(),
        base_url,
        timeout_secs,
        ..Default::default()
    }
}
