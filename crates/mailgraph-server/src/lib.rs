//! mailgraph-server: HTTP API for the Mailgraph email graph.
//!
//! Three endpoints under `/api`: a health check, a chat-completion proxy to
//! the configured LLM, and a whole-graph fetch for visualization.

pub mod error;
pub mod llm;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
