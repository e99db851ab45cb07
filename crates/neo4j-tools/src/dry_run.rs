// ABOUTME: In-memory connector that records statements instead of sending them
// ABOUTME: Backs the server's --dry-run mode and the adapter tests

use async_trait::async_trait;
use neo4j_tools_core::{CypherStatement, Neo4jCredentials, Neo4jToolError, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::session::{GraphConnector, GraphSession, QueryOutcome, Row, TxMode};

/// One statement as it reached the session
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    pub statement: CypherStatement,
    pub mode: TxMode,
}

#[derive(Debug, Default)]
struct Recorder {
    statements: Vec<RecordedStatement>,
    opened: usize,
    closed: usize,
    canned: VecDeque<Vec<Row>>,
    open_failure: Option<String>,
    run_failure: Option<String>,
}

/// Connector double. Clones share the same recording.
///
/// Each `run` pops the next queued row set (empty when none is queued).
#[derive(Debug, Clone, Default)]
pub struct DryRunConnector {
    recorder: Arc<Mutex<Recorder>>,
}

impl DryRunConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next `run`
    pub fn push_rows(&self, rows: Vec<Row>) -> &Self {
        self.recorder.lock().canned.push_back(rows);
        self
    }

    /// Make every subsequent `open` fail with `message`
    pub fn fail_open(&self, message: impl Into<String>) -> &Self {
        self.recorder.lock().open_failure = Some(message.into());
        self
    }

    /// Make every subsequent `run` fail with `message`
    pub fn fail_run(&self, message: impl Into<String>) -> &Self {
        self.recorder.lock().run_failure = Some(message.into());
        self
    }

    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.recorder.lock().statements.clone()
    }

    pub fn last_statement(&self) -> Option<RecordedStatement> {
        self.recorder.lock().statements.last().cloned()
    }

    pub fn sessions_opened(&self) -> usize {
        self.recorder.lock().opened
    }

    pub fn sessions_closed(&self) -> usize {
        self.recorder.lock().closed
    }
}

#[async_trait]
impl GraphConnector for DryRunConnector {
    async fn open(&self, credentials: &Neo4jCredentials) -> Result<Box<dyn GraphSession>> {
        let mut recorder = self.recorder.lock();
        if let Some(message) = &recorder.open_failure {
            return Err(Neo4jToolError::statement_execution(message.clone()));
        }
        recorder.opened += 1;
        tracing::debug!(uri = %credentials.bolt_url, "Dry-run session opened");

        Ok(Box::new(DryRunSession {
            recorder: self.recorder.clone(),
        }))
    }
}

struct DryRunSession {
    recorder: Arc<Mutex<Recorder>>,
}

#[async_trait]
impl GraphSession for DryRunSession {
    async fn run(&mut self, statement: &CypherStatement, mode: TxMode) -> Result<QueryOutcome> {
        let mut recorder = self.recorder.lock();
        recorder.statements.push(RecordedStatement {
            statement: statement.clone(),
            mode,
        });

        if let Some(message) = &recorder.run_failure {
            return Err(Neo4jToolError::statement_execution(message.clone()));
        }

        let rows = recorder.canned.pop_front().unwrap_or_default();
        Ok(QueryOutcome { rows })
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.recorder.lock().closed += 1;
        Ok(())
    }
}
