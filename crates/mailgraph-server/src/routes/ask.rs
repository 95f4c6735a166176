//! LLM proxy route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use mailgraph_core::config::LlmSettings;

use crate::error::ApiError;
use crate::llm::LlmClient;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ask", post(api_ask))
}

/// POST /api/ask. Forward the prompt to the LLM.
async fn api_ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let reply = ask(&state.llm, &state.config.llm, &req).await?;
    Ok(Json(reply))
}

/// Resolve the model against the allow-list and run the completion.
/// An unknown model falls back to the default instead of failing.
pub async fn ask(
    llm: &LlmClient,
    settings: &LlmSettings,
    req: &AskRequest,
) -> Result<AskResponse, ApiError> {
    let model = settings.resolve_model(req.model.as_deref());
    if let Some(requested) = req.model.as_deref().filter(|m| *m != model) {
        tracing::info!(requested, model, "Model not in allow-list, using default");
    }

    let response = llm.complete(model, &req.prompt).await?;
    Ok(AskResponse { response })
}
