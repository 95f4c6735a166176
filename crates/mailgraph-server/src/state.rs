//! Shared application state.

use mailgraph_core::AppConfig;
use mailgraph_graph::GraphClient;

use crate::llm::LlmClient;

/// Everything a request handler needs, built once at startup and shared as
/// `Arc<AppState>`. Dropping the last `Arc` closes the Neo4j pool.
pub struct AppState {
    pub config: AppConfig,
    pub graph: GraphClient,
    pub llm: LlmClient,
}

impl AppState {
    pub fn new(config: AppConfig, graph: GraphClient, llm: LlmClient) -> Self {
        Self { config, graph, llm }
    }
}
