//! Read operations for the email graph.

use neo4rs::query;
use serde_json::Value;

use mailgraph_core::{GraphSnapshot, Person, SentEmail, Timestamp};

use crate::client::{GraphClient, GraphError, Record};

const PEOPLE_QUERY: &str = "MATCH (p:Person) RETURN id(p) AS id, p.email AS email";
const PEOPLE_COLUMNS: &[&str] = &["id", "email"];

const SENT_QUERY: &str = "MATCH (p:Person)-[r:SENT]->(q:Person)
     RETURN id(p) AS source, id(q) AS target, r.subject AS subject, r.timestamp AS timestamp";
const SENT_COLUMNS: &[&str] = &["source", "target", "subject", "timestamp"];

/// One line of the `sample` listing: who sent what.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SentSummary {
    pub sender: Option<String>,
    pub subject: Option<String>,
}

impl GraphClient {
    // ── Whole-Graph Reads ────────────────────────────────────────

    /// All Person nodes, in store order.
    pub async fn fetch_people(&self) -> Result<Vec<Person>, GraphError> {
        let records = self.query_records(query(PEOPLE_QUERY), PEOPLE_COLUMNS).await?;
        records.iter().map(person_from_record).collect()
    }

    /// All SENT edges, in store order.
    pub async fn fetch_sent(&self) -> Result<Vec<SentEmail>, GraphError> {
        let records = self.query_records(query(SENT_QUERY), SENT_COLUMNS).await?;
        records.iter().map(sent_from_record).collect()
    }

    /// Materialize the whole graph. No pagination: every node and edge is
    /// loaded into memory on each call.
    pub async fn fetch_graph(&self) -> Result<GraphSnapshot, GraphError> {
        let nodes = self.fetch_people().await?;
        let edges = self.fetch_sent().await?;
        tracing::debug!(nodes = nodes.len(), edges = edges.len(), "Fetched graph");
        Ok(GraphSnapshot { nodes, edges })
    }

    // ── Lookups ──────────────────────────────────────────────────

    /// Find a Person by email.
    pub async fn find_person(&self, email: &str) -> Result<Option<Person>, GraphError> {
        let q = query(
            "MATCH (p:Person {email: $email})
             RETURN id(p) AS id, p.email AS email LIMIT 1",
        )
        .param("email", email.to_string());

        let records = self.query_records(q, PEOPLE_COLUMNS).await?;
        records.first().map(person_from_record).transpose()
    }

    /// Count SENT edges from one person to another.
    pub async fn count_sent_between(
        &self,
        sender: &str,
        receiver: &str,
    ) -> Result<i64, GraphError> {
        let q = query(
            "MATCH (:Person {email: $sender})-[r:SENT]->(:Person {email: $receiver})
             RETURN count(r) AS cnt",
        )
        .param("sender", sender.to_string())
        .param("receiver", receiver.to_string());

        match self.query_one(q).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Connectivity smoke test: the greeting the server echoes back.
    pub async fn hello(&self) -> Result<Option<String>, GraphError> {
        let records = self
            .query_records(query("RETURN 'Hello Neo4j' AS msg"), &["msg"])
            .await?;
        Ok(records.first().and_then(|r| opt_str(r, "msg")))
    }

    /// A few SENT edges with sender and subject, for eyeballing a load.
    pub async fn sample_sent(&self, limit: u32) -> Result<Vec<SentSummary>, GraphError> {
        let q = query(
            "MATCH (p:Person)-[r:SENT]->(:Person)
             RETURN p.email AS sender, r.subject AS subject
             LIMIT $limit",
        )
        .param("limit", limit as i64);

        let records = self.query_records(q, &["sender", "subject"]).await?;
        Ok(records
            .iter()
            .map(|r| SentSummary {
                sender: opt_str(r, "sender"),
                subject: opt_str(r, "subject"),
            })
            .collect())
    }
}

// ── Record Mapping ───────────────────────────────────────────────

fn person_from_record(record: &Record) -> Result<Person, GraphError> {
    Ok(Person {
        id: stringify_id(record, "id")?,
        email: opt_str(record, "email"),
    })
}

fn sent_from_record(record: &Record) -> Result<SentEmail, GraphError> {
    let timestamp = match record.get("timestamp") {
        None | Some(Value::Null) => None,
        Some(v) => Some(serde_json::from_value::<Timestamp>(v.clone()).map_err(|e| {
            GraphError::Serialization(format!("Unsupported timestamp value {v}: {e}"))
        })?),
    };

    Ok(SentEmail {
        source: stringify_id(record, "source")?,
        target: stringify_id(record, "target")?,
        subject: opt_str(record, "subject"),
        timestamp,
    })
}

/// Internal ids come back as integers; the frontend wants strings.
fn stringify_id(record: &Record, column: &str) -> Result<String, GraphError> {
    match record.get(column) {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(GraphError::Serialization(format!(
            "Column {column} is not an id: {other:?}"
        ))),
    }
}

fn opt_str(record: &Record, column: &str) -> Option<String> {
    record.get(column).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn person_id_is_stringified() {
        let person = person_from_record(&record(json!({"id": 42, "email": "a@x.com"}))).unwrap();
        assert_eq!(
            person,
            Person {
                id: "42".to_string(),
                email: Some("a@x.com".to_string()),
            }
        );
    }

    #[test]
    fn person_without_email_is_kept() {
        let person = person_from_record(&record(json!({"id": 3, "email": null}))).unwrap();
        assert_eq!(person.id, "3");
        assert_eq!(person.email, None);
    }

    #[test]
    fn person_without_id_is_rejected() {
        let err = person_from_record(&record(json!({"id": null, "email": "a@x.com"})));
        assert!(matches!(err, Err(GraphError::Serialization(_))));
    }

    #[test]
    fn sent_edge_maps_all_columns() {
        let sent = sent_from_record(&record(json!({
            "source": 0,
            "target": 1,
            "subject": "Budget Report",
            "timestamp": "2024-03-01T10:00:00Z",
        })))
        .unwrap();
        assert_eq!(sent.source, "0");
        assert_eq!(sent.target, "1");
        assert_eq!(sent.subject.as_deref(), Some("Budget Report"));
        assert_eq!(
            sent.timestamp,
            Some(Timestamp::Text("2024-03-01T10:00:00Z".to_string()))
        );
    }

    #[test]
    fn sent_edge_keeps_numeric_timestamp() {
        let sent = sent_from_record(&record(json!({
            "source": 5,
            "target": 6,
            "subject": "Hiring Update",
            "timestamp": 1709287200,
        })))
        .unwrap();
        assert_eq!(sent.timestamp, Some(Timestamp::Integer(1709287200)));
    }

    #[test]
    fn sent_edge_with_null_timestamp() {
        let sent = sent_from_record(&record(json!({
            "source": 5,
            "target": 6,
            "subject": null,
            "timestamp": null,
        })))
        .unwrap();
        assert_eq!(sent.subject, None);
        assert_eq!(sent.timestamp, None);
    }

    #[test]
    fn queries_project_declared_columns() {
        for column in PEOPLE_COLUMNS {
            assert!(PEOPLE_QUERY.contains(&format!("AS {column}")));
        }
        for column in SENT_COLUMNS {
            assert!(SENT_QUERY.contains(&format!("AS {column}")));
        }
    }
}
