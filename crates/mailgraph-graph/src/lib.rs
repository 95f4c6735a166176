//! Mailgraph Graph: Neo4j client for the email graph.
//!
//! This crate is the single access point for the Neo4j store. Ingestion
//! writes `Person` nodes and `SENT` edges through [`GraphClient::ingest_email`];
//! the API reads the whole graph back through [`GraphClient::fetch_graph`]
//! and shapes it for visualization with [`snapshot::to_elements`].
//!
//! Every query is parameterized. Caller-supplied values never reach
//! Cypher text.

pub mod client;
pub mod mutations;
pub mod queries;
pub mod snapshot;

pub use client::{GraphClient, GraphConfig, GraphError, Record};
pub use queries::SentSummary;
