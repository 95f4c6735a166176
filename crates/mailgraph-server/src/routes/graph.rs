//! Graph data route for the frontend visualization.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use mailgraph_core::GraphElement;
use mailgraph_graph::snapshot;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub elements: Vec<GraphElement>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/graph", get(get_graph))
}

/// GET /api/graph. Every Person node followed by every SENT edge.
async fn get_graph(State(state): State<Arc<AppState>>) -> Result<Json<GraphResponse>, ApiError> {
    let graph = state.graph.fetch_graph().await?;

    let dangling = snapshot::dangling_edges(&graph).len();
    if dangling > 0 {
        tracing::warn!(dangling, "Graph snapshot has edges to nodes it did not return");
    }

    Ok(Json(GraphResponse {
        elements: snapshot::to_elements(graph),
    }))
}
