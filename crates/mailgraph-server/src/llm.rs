//! Client for the LLM collaborator (OpenAI-compatible chat completions).
//!
//! One non-streaming request per call. No retries and no local fallback
//! text: a failed upstream call is reported to the caller as-is.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mailgraph_core::config::LlmSettings;

/// Errors from the LLM collaborator.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("LLM request timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM response had no message content")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Process-wide LLM client. Clone is cheap (reqwest pools connections).
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::Request)?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
            timeout,
        })
    }

    /// Send a single user prompt and return the assistant's reply text.
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Requesting completion from {} with model {}", self.endpoint, model);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| self.classify(e))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }

    fn classify(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Request(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::test_support::{llm_settings as settings, spawn_upstream};

    async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": format!(
                        "{}|{}|{}",
                        body["model"].as_str().unwrap_or_default(),
                        body["messages"][0]["content"].as_str().unwrap_or_default(),
                        auth
                    ),
                }
            }]
        }))
    }

    #[tokio::test]
    async fn sends_prompt_model_and_key() {
        let base = spawn_upstream(Router::new().route("/v1/chat/completions", post(echo))).await;
        let client = LlmClient::new(&settings(base, 5)).unwrap();

        let reply = client.complete("gpt-4", "hello").await.unwrap();
        assert_eq!(reply, "gpt-4|hello|Bearer sk-test");
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_ignored() {
        let base = spawn_upstream(Router::new().route("/v1/chat/completions", post(echo))).await;
        let client = LlmClient::new(&settings(format!("{base}/"), 5)).unwrap();
        assert!(client.complete("gpt-4", "hi").await.is_ok());
    }

    #[tokio::test]
    async fn upstream_error_status_is_surfaced() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base = spawn_upstream(app).await;
        let client = LlmClient::new(&settings(base, 5)).unwrap();

        match client.complete("gpt-4", "hello").await {
            Err(LlmError::Status { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let base = spawn_upstream(app).await;
        let client = LlmClient::new(&settings(base, 5)).unwrap();

        assert!(matches!(
            client.complete("gpt-4", "hello").await,
            Err(LlmError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"choices": []}))
            }),
        );
        let base = spawn_upstream(app).await;
        let client = LlmClient::new(&settings(base, 1)).unwrap();

        assert!(matches!(
            client.complete("gpt-4", "hello").await,
            Err(LlmError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_request_error() {
        // Bind then drop to get a port nobody is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = LlmClient::new(&settings(format!("http://{addr}/v1"), 5)).unwrap();
        assert!(matches!(
            client.complete("gpt-4", "hello").await,
            Err(LlmError::Request(_))
        ));
    }
}
