//! Write operations for the email graph.
//!
//! All mutations use MERGE (upsert) semantics so that re-running ingestion
//! over the same input leaves the graph unchanged. Person nodes are
//! identified by `email`; SENT edges by (sender, receiver, subject, timestamp).

use neo4rs::{query, BoltType};

use mailgraph_core::{EmailRecord, Timestamp};

use crate::client::{GraphClient, GraphError};

const INGEST_EMAIL: &str = "MERGE (s:Person {email: $sender})
     MERGE (r:Person {email: $receiver})
     MERGE (s)-[:SENT {subject: $subject, timestamp: $timestamp}]->(r)";

impl GraphClient {
    // ── Schema ───────────────────────────────────────────────────

    /// Create the uniqueness constraint on `Person.email` if it is missing.
    pub async fn ensure_schema(&self) -> Result<(), GraphError> {
        let q = query(
            "CREATE CONSTRAINT person_email IF NOT EXISTS
             FOR (p:Person) REQUIRE p.email IS UNIQUE",
        );
        self.run(q).await?;
        tracing::debug!("Person.email uniqueness constraint in place");
        Ok(())
    }

    // ── Email Upserts ────────────────────────────────────────────

    /// Upsert one email: both Person nodes and the SENT edge between them,
    /// in a single transaction.
    pub async fn ingest_email(&self, email: &EmailRecord) -> Result<(), GraphError> {
        let q = query(INGEST_EMAIL)
            .param("sender", email.sender.clone())
            .param("receiver", email.receiver.clone())
            .param("subject", email.subject.clone())
            .param("timestamp", timestamp_param(&email.timestamp));

        self.bounded(async {
            let mut txn = self.inner().start_txn().await?;
            if let Err(e) = txn.run(q).await {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed");
                }
                return Err(GraphError::from(e));
            }
            txn.commit().await?;
            Ok::<(), GraphError>(())
        })
        .await
    }
}

/// Pass a timestamp to Neo4j in its original type.
fn timestamp_param(ts: &Timestamp) -> BoltType {
    match ts {
        Timestamp::Integer(v) => BoltType::from(*v),
        Timestamp::Float(v) => BoltType::from(*v),
        Timestamp::Text(v) => BoltType::from(v.clone()),
    }
}
