//! Core domain types for the Mailgraph email graph.
//!
//! `EmailRecord` is what the ingestion job consumes. `Person` and `SentEmail`
//! are what the graph returns when read back, and `GraphElement` is the
//! visualization shape served to the frontend.

use serde::{Deserialize, Serialize};

// ── Ingestion Input ───────────────────────────────────────────────

/// An email timestamp. Opaque to Mailgraph: whatever the source provided is
/// stored and returned unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Timestamp {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Timestamp::Text(value.to_string())
    }
}

/// A single email as read from the ingestion input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailRecord {
    pub sender: String,
    pub receiver: String,
    pub subject: String,
    pub timestamp: Timestamp,
}

impl EmailRecord {
    /// The tuple that identifies one SENT edge in the graph. The timestamp
    /// is keyed by its JSON form so `"1"` and `1` stay distinct.
    pub fn edge_key(&self) -> (&str, &str, &str, String) {
        (
            &self.sender,
            &self.receiver,
            &self.subject,
            serde_json::to_string(&self.timestamp).unwrap_or_default(),
        )
    }
}

// ── Graph Read Types ──────────────────────────────────────────────

/// A `Person` node read back from the graph.
///
/// `id` is the store-assigned internal id, stringified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: String,
    pub email: Option<String>,
}

/// A `SENT` relationship read back from the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentEmail {
    pub source: String,
    pub target: String,
    pub subject: Option<String>,
    pub timestamp: Option<Timestamp>,
}

/// The whole graph, materialized in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphSnapshot {
    pub nodes: Vec<Person>,
    pub edges: Vec<SentEmail>,
}

// ── Visualization ─────────────────────────────────────────────────

/// Payload of a visualization element: either a node or an edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ElementData {
    Node(Person),
    Edge(SentEmail),
}

/// One entry of the `elements` list served by the graph endpoint
/// (Cytoscape.js element format: `{"data": {...}}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphElement {
    pub data: ElementData,
}

impl GraphElement {
    pub fn node(person: Person) -> Self {
        Self {
            data: ElementData::Node(person),
        }
    }

    pub fn edge(sent: SentEmail) -> Self {
        Self {
            data: ElementData::Edge(sent),
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self.data, ElementData::Node(_))
    }
}
