// ABOUTME: Bolt implementation of the session seam on top of neo4rs
// ABOUTME: A driver is built per session and dropped on close, releasing its connections

use async_trait::async_trait;
use neo4j_tools_core::{ConnectionConfig, CypherStatement, Neo4jCredentials, Neo4jToolError, Result};
use neo4rs::{BoltNull, BoltType, ConfigBuilder, Graph, Node, Query, Txn};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt::Display;
use tracing::{debug, warn};

use crate::session::{GraphConnector, GraphSession, QueryOutcome, Row, TxMode};

/// Connects to a Neo4j server over Bolt
#[derive(Debug, Clone, Default)]
pub struct BoltConnector {
    connection: ConnectionConfig,
}

impl BoltConnector {
    pub fn new(connection: ConnectionConfig) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl GraphConnector for BoltConnector {
    async fn open(&self, credentials: &Neo4jCredentials) -> Result<Box<dyn GraphSession>> {
        let mut builder = ConfigBuilder::default()
            .uri(credentials.bolt_url.as_str())
            .user(credentials.username.as_str())
            .password(credentials.password())
            .fetch_size(self.connection.fetch_size)
            .max_connections(self.connection.max_connections);

        if let Some(database) = &self.connection.database {
            builder = builder.db(database.as_str());
        }

        let config = builder.build().map_err(driver_error)?;
        let graph = Graph::connect(config).await.map_err(driver_error)?;

        debug!(uri = %credentials.bolt_url, "Bolt session opened");
        Ok(Box::new(BoltSession { graph }))
    }
}

struct BoltSession {
    graph: Graph,
}

#[async_trait]
impl GraphSession for BoltSession {
    async fn run(&mut self, statement: &CypherStatement, mode: TxMode) -> Result<QueryOutcome> {
        let query = to_query(statement);

        let rows = match mode {
            TxMode::AutoCommit => {
                let mut stream = self.graph.execute(query).await.map_err(driver_error)?;
                let mut rows = Vec::new();
                while let Some(row) = stream.next().await.map_err(driver_error)? {
                    rows.push(row_to_json(&row)?);
                }
                rows
            }
            TxMode::Explicit => {
                let mut txn = self.graph.start_txn().await.map_err(driver_error)?;
                match collect_in_txn(&mut txn, query).await {
                    Ok(rows) => {
                        txn.commit().await.map_err(driver_error)?;
                        rows
                    }
                    Err(e) => {
                        if let Err(rollback) = txn.rollback().await {
                            warn!("Rollback after failed statement also failed: {}", rollback);
                        }
                        return Err(e);
                    }
                }
            }
        };

        Ok(QueryOutcome { rows })
    }

    async fn close(self: Box<Self>) -> Result<()> {
        drop(self.graph);
        debug!("Bolt session closed");
        Ok(())
    }
}

async fn collect_in_txn(txn: &mut Txn, query: Query) -> Result<Vec<Row>> {
    let mut stream = txn.execute(query).await.map_err(driver_error)?;
    let mut rows = Vec::new();
    while let Some(row) = stream.next(txn.handle()).await.map_err(driver_error)? {
        rows.push(row_to_json(&row)?);
    }
    Ok(rows)
}

fn to_query(statement: &CypherStatement) -> Query {
    statement
        .params
        .iter()
        .fold(neo4rs::query(&statement.text), |query, (name, value)| {
            query.param(name.as_str(), to_bolt(value))
        })
}

fn to_bolt(value: &JsonValue) -> BoltType {
    match value {
        JsonValue::Null => BoltType::Null(BoltNull),
        JsonValue::Bool(b) => BoltType::from(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => BoltType::from(s.clone()),
        JsonValue::Array(items) => BoltType::from(items.iter().map(to_bolt).collect::<Vec<_>>()),
        JsonValue::Object(map) => BoltType::from(
            map.iter()
                .map(|(k, v)| (k.clone(), to_bolt(v)))
                .collect::<HashMap<String, BoltType>>(),
        ),
    }
}

/// Columns as JSON; graph nodes become their properties plus a `_labels` list
fn row_to_json(row: &neo4rs::Row) -> Result<Row> {
    let value: JsonValue = row.to().map_err(driver_error)?;
    let JsonValue::Object(mut columns) = value else {
        return Err(Neo4jToolError::statement_execution(
            "Result row did not decode into named columns",
        ));
    };

    for (key, column) in columns.iter_mut() {
        let Ok(node) = row.get::<Node>(key) else {
            continue;
        };
        if let JsonValue::Object(props) = column {
            let labels = node
                .labels()
                .iter()
                .map(|l| JsonValue::String(l.to_string()))
                .collect();
            props.insert("_labels".to_string(), JsonValue::Array(labels));
        }
    }

    Ok(columns)
}

fn driver_error(err: impl Display) -> Neo4jToolError {
    Neo4jToolError::statement_execution(err.to_string())
}
