//! Neo4j connection management and shared graph client.

use std::future::Future;
use std::time::Duration;

use neo4rs::{query, ConfigBuilder, Graph, Query};

use mailgraph_core::config::Neo4jSettings;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Neo4j query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A single result row: column alias to value, in declared column order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
    pub query_timeout: Duration,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::from(&Neo4jSettings::default())
    }
}

impl From<&Neo4jSettings> for GraphConfig {
    fn from(settings: &Neo4jSettings) -> Self {
        Self {
            uri: settings.uri.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
            query_timeout: Duration::from_secs(settings.query_timeout_secs),
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// This is the single point of access for all email graph operations.
/// Clone is cheap (inner Arc). Every call checks a connection out of the
/// pool and returns it when the call finishes, whether it succeeded or not.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    query_timeout: Duration,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    ///
    /// Runs a round-trip query before returning so that an unreachable
    /// server or rejected credentials surface here, not on first use.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let client = Self {
            graph,
            query_timeout: config.query_timeout,
        };

        client.ping().await.map_err(|e| match e {
            GraphError::Connection(msg) => GraphError::Connection(msg),
            other => GraphError::Connection(other.to_string()),
        })?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(client)
    }

    /// Get a reference to the underlying neo4rs Graph for direct operations.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<(), GraphError> {
        self.query_one(query("RETURN 1 AS ok")).await?;
        Ok(())
    }

    /// Execute a write-only query (CREATE, MERGE, DELETE, SET).
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.bounded(async { self.graph.run(query).await.map_err(GraphError::from) })
            .await
    }

    /// Execute a read query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, GraphError> {
        self.bounded(async {
            let mut stream = self.graph.execute(query).await?;
            let mut rows = Vec::new();
            while let Some(row) = stream.next().await? {
                rows.push(row);
            }
            Ok::<_, GraphError>(rows)
        })
        .await
    }

    /// Execute a read query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, GraphError> {
        self.bounded(async {
            let mut stream = self.graph.execute(query).await?;
            Ok::<_, GraphError>(stream.next().await?)
        })
        .await
    }

    /// Execute a read query and map each row to a [`Record`] holding the
    /// given columns. A column missing from a row maps to null.
    pub async fn query_records(
        &self,
        query: Query,
        columns: &[&str],
    ) -> Result<Vec<Record>, GraphError> {
        let rows = self.query_rows(query).await?;
        Ok(rows.iter().map(|row| row_to_record(row, columns)).collect())
    }

    /// Begin a transaction.
    pub async fn start_txn(&self) -> Result<neo4rs::Txn, GraphError> {
        self.bounded(async { self.graph.start_txn().await.map_err(GraphError::from) })
            .await
    }

    /// Run a store future under the configured timeout. On expiry the future
    /// is dropped, which abandons the in-flight request.
    pub(crate) async fn bounded<T, F>(&self, fut: F) -> Result<T, GraphError>
    where
        F: Future<Output = Result<T, GraphError>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout = ?self.query_timeout, "Neo4j call timed out");
                Err(GraphError::Timeout(self.query_timeout))
            }
        }
    }
}

/// Copy the named columns of a row into a [`Record`].
fn row_to_record(row: &neo4rs::Row, columns: &[&str]) -> Record {
    let mut record = Record::new();
    for column in columns {
        let value = row
            .get::<serde_json::Value>(column)
            .unwrap_or(serde_json::Value::Null);
        record.insert((*column).to_string(), value);
    }
    record
}
