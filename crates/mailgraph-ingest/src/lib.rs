//! mailgraph-ingest: Batch loader for the Mailgraph email graph.
//!
//! Reads a JSON array of email records, validates the whole batch, then
//! upserts each record into Neo4j as two `Person` nodes joined by a `SENT`
//! edge. The batch aborts on the first error.

pub mod config;
pub mod error;
pub mod job;
pub mod reader;

pub use error::IngestError;
pub use job::{run_ingestion, IngestReport};
