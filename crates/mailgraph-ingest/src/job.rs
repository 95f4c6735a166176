//! The ingestion job: upsert a validated batch into the graph.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use mailgraph_core::EmailRecord;
use mailgraph_graph::GraphClient;

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};

/// Outcome of a successful ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// Records written, duplicates included.
    pub records: usize,
    /// Distinct email addresses in the batch.
    pub people: usize,
    /// Distinct (sender, receiver, subject, timestamp) tuples in the batch.
    pub edges: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Distinct people and distinct edges a batch should produce in an empty
/// graph.
pub fn batch_shape(records: &[EmailRecord]) -> (usize, usize) {
    let people: HashSet<&str> = records
        .iter()
        .flat_map(|r| [r.sender.as_str(), r.receiver.as_str()])
        .collect();
    let edges: HashSet<_> = records.iter().map(EmailRecord::edge_key).collect();
    (people.len(), edges.len())
}

/// Ingest every record in input order, one transaction per record.
///
/// Aborts on the first store error. Records before the failing one stay
/// committed; re-running the same batch is safe because every write is a
/// MERGE.
pub async fn run_ingestion(
    graph: &GraphClient,
    records: &[EmailRecord],
    config: &IngestConfig,
) -> Result<IngestReport> {
    let started_at = Utc::now();

    if config.ensure_schema {
        graph.ensure_schema().await?;
    }

    for (index, record) in records.iter().enumerate() {
        graph
            .ingest_email(record)
            .await
            .map_err(|source| IngestError::Graph { index, source })?;

        if config.progress_every > 0 && (index + 1) % config.progress_every == 0 {
            tracing::info!(done = index + 1, total = records.len(), "Ingestion progress");
        }
    }

    let (people, edges) = batch_shape(records);
    let report = IngestReport {
        records: records.len(),
        people,
        edges,
        started_at,
        finished_at: Utc::now(),
    };

    tracing::info!(
        records = report.records,
        people = report.people,
        edges = report.edges,
        "Ingested {} emails",
        report.records
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use mailgraph_core::Timestamp;

    use super::*;

    fn record(sender: &str, receiver: &str, subject: &str, ts: &str) -> EmailRecord {
        EmailRecord {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            subject: subject.to_string(),
            timestamp: Timestamp::from(ts),
        }
    }

    #[test]
    fn single_email_shape() {
        let records = vec![record("a@x.com", "b@x.com", "Hi", "t1")];
        assert_eq!(batch_shape(&records), (2, 1));
    }

    #[test]
    fn duplicate_tuples_collapse() {
        let records = vec![
            record("a@x.com", "b@x.com", "Hi", "t1"),
            record("a@x.com", "b@x.com", "Hi", "t1"),
            record("a@x.com", "b@x.com", "Hi", "t2"),
            record("b@x.com", "a@x.com", "Hi", "t1"),
        ];
        assert_eq!(batch_shape(&records), (2, 3));
    }

    #[test]
    fn self_addressed_email_is_one_person() {
        let records = vec![record("a@x.com", "a@x.com", "Note to self", "t1")];
        assert_eq!(batch_shape(&records), (1, 1));
    }

    #[test]
    fn empty_batch_shape() {
        assert_eq!(batch_shape(&[]), (0, 0));
    }
}
