//! Error types for the mailgraph-ingest crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read input {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Input is not a JSON array of email records: {0}")]
    Parse(String),

    #[error("Invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Graph error while ingesting record {index}: {source}")]
    Graph {
        index: usize,
        #[source]
        source: mailgraph_graph::GraphError,
    },

    #[error("Graph error: {0}")]
    Schema(#[from] mailgraph_graph::GraphError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
