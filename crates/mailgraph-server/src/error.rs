//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use mailgraph_graph::GraphError;

use crate::llm::LlmError;

/// Errors surfaced by route handlers. Every failure becomes a JSON body
/// `{"error": "..."}` with a status that says which collaborator failed.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Graph(GraphError::Connection(_) | GraphError::Timeout(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Graph(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Llm(LlmError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Llm(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
