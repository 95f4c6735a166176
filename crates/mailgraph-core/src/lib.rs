//! mailgraph-core: Shared types, configuration, and error handling for Mailgraph.
//!
//! This crate provides the foundational types used across all Mailgraph components:
//! - Email records as read by the ingestion job
//! - Person nodes and SENT edges as read back from the graph
//! - Visualization elements for the graph endpoint
//! - Layered configuration (defaults, file, environment)
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::MailgraphError;
pub use types::{EmailRecord, GraphElement, GraphSnapshot, Person, SentEmail, Timestamp};
