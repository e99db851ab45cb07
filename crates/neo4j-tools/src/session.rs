// ABOUTME: Database session seam used by the tool adapters
// ABOUTME: One session per invocation, always closed, whatever the statement outcome

use async_trait::async_trait;
use neo4j_tools_core::{CypherStatement, Neo4jCredentials, Result};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{debug, warn};

/// A result row keyed by the returned column names
pub type Row = JsonMap<String, JsonValue>;

/// How a statement is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// Implicit transaction managed by the server
    AutoCommit,
    /// One explicit transaction, committed after all rows are consumed
    Explicit,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    pub rows: Vec<Row>,
}

#[async_trait]
pub trait GraphSession: Send {
    async fn run(&mut self, statement: &CypherStatement, mode: TxMode) -> Result<QueryOutcome>;

    /// Release the connection. Called exactly once per session.
    async fn close(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait GraphConnector: Send + Sync {
    async fn open(&self, credentials: &Neo4jCredentials) -> Result<Box<dyn GraphSession>>;
}

/// Open a session, run one statement, and close the session on every path
pub async fn run_in_session(
    connector: &dyn GraphConnector,
    credentials: &Neo4jCredentials,
    statement: &CypherStatement,
    mode: TxMode,
) -> Result<QueryOutcome> {
    let mut session = connector.open(credentials).await?;
    debug!(?mode, params = statement.params.len(), "Running statement:\n{}", statement.text);

    let outcome = session.run(statement, mode).await;

    if let Err(e) = session.close().await {
        warn!("Failed to close graph session cleanly: {}", e);
    }

    outcome
}
