// ABOUTME: Tool executor for the Neo4j tools
// ABOUTME: Validates parameters, builds Cypher, runs it in a scoped session
// ABOUTME: and formats the reply text

use neo4j_tools_core::{
    CypherStatement, ExecutionConfig, InsertBuilder, MatchBuilder, Neo4jCredentials,
    Neo4jToolError, NodeSpec, PatternFragment, RelationshipSpec, Result, StatementKind,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::params::{list_param, required_str};
use crate::render::render_rows;
use crate::session::{run_in_session, GraphConnector, TxMode};
use crate::tool_schemas::{Neo4jToolSchemas, ADD_TEXT_TOOL, ADD_TOOL, FIND_TOOL, QUERY_TOOL};

const TOOL_PROGRESS_LOG_TARGET: &str = "neo4j_tools::tools";

const ADD_TEXT_STATEMENT: &str = "CREATE (n:Text {content: $text}) RETURN n";
const NO_RESULTS: &str = "Query succeeded but returned no results.";

/// Executes tool calls against one Neo4j endpoint
pub struct Neo4jToolExecutor {
    connector: Arc<dyn GraphConnector>,
    credentials: Neo4jCredentials,
    execution: ExecutionConfig,
}

impl Neo4jToolExecutor {
    pub fn new(
        connector: Arc<dyn GraphConnector>,
        credentials: Neo4jCredentials,
        execution: ExecutionConfig,
    ) -> Self {
        info!(
            uri = %credentials.bolt_url,
            binding = ?execution.value_binding,
            "Neo4jToolExecutor initialized with max_result_bytes: {}",
            execution.max_result_bytes
        );
        Self {
            connector,
            credentials,
            execution,
        }
    }

    pub fn credentials(&self) -> &Neo4jCredentials {
        &self.credentials
    }

    /// Execute a tool call and return its reply text
    pub async fn execute(&self, tool_name: &str, parameters: JsonValue) -> Result<String> {
        log_tool_call_start(tool_name, &parameters);

        let result = async {
            Neo4jToolSchemas::get_by_name(tool_name)
                .ok_or_else(|| Neo4jToolError::unknown_tool(tool_name))?;

            match tool_name {
                QUERY_TOOL => self.execute_query(&parameters).await,
                ADD_TEXT_TOOL => self.execute_add_text(&parameters).await,
                ADD_TOOL => self.execute_add(&parameters).await,
                FIND_TOOL => self.execute_find(&parameters).await,
                _ => Err(Neo4jToolError::unknown_tool(tool_name)),
            }
        }
        .await;

        match &result {
            Ok(text) => log_tool_call_finish(tool_name, text),
            Err(err) => error!(
                target: TOOL_PROGRESS_LOG_TARGET,
                tool = tool_name,
                "Tool call failed: {}",
                err
            ),
        }
        result
    }

    /// Run an arbitrary Cypher statement in one explicit transaction
    pub async fn execute_query(&self, params: &JsonValue) -> Result<String> {
        let query = required_str(params, "query")?;
        let kind = StatementKind::classify(query);
        debug!(tool = QUERY_TOOL, kind = %kind, "Classified statement");

        let outcome = self
            .run(&CypherStatement::new(query), TxMode::Explicit, "query")
            .await?;
        let rows = &outcome.rows;

        if !kind.is_read() {
            let mut text = format!(
                "Query executed successfully ({}). Rows returned: {}",
                kind,
                rows.len()
            );
            if !rows.is_empty() {
                text.push('\n');
                text.push_str(&render_rows(QUERY_TOOL, rows, self.execution.max_result_bytes));
            }
            return Ok(text);
        }

        if rows.is_empty() {
            Ok(NO_RESULTS.to_string())
        } else {
            Ok(format!(
                "Query succeeded. Results: {}",
                render_rows(QUERY_TOOL, rows, self.execution.max_result_bytes)
            ))
        }
    }

    pub async fn execute_add_text(&self, params: &JsonValue) -> Result<String> {
        let text = params
            .get("text")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Neo4jToolError::input_validation("Missing required parameter: text"))?;

        let statement = CypherStatement::new(ADD_TEXT_STATEMENT).with_param("text", text);
        self.run(&statement, TxMode::AutoCommit, "text insert").await?;

        Ok("Node added successfully.".to_string())
    }

    pub async fn execute_add(&self, params: &JsonValue) -> Result<String> {
        let nodes: Vec<NodeSpec> = list_param(params, "nodes")?;
        let relationships: Vec<RelationshipSpec> = list_param(params, "relationships")?;

        let plan = InsertBuilder::new(self.execution.value_binding).build(&nodes, &relationships)?;
        debug!(
            tool = ADD_TOOL,
            nodes = nodes.len(),
            relationships = relationships.len(),
            "Built insert statement"
        );

        self.run(&plan.statement, TxMode::Explicit, "insert").await?;

        if plan.counters.contains_updates() {
            Ok(format!(
                "Insert operation succeeded. Modification details: {}",
                plan.counters
            ))
        } else {
            Ok("Insert operation completed but no modifications were made.".to_string())
        }
    }

    pub async fn execute_find(&self, params: &JsonValue) -> Result<String> {
        let patterns: Vec<PatternFragment> = list_param(params, "patterns")?;
        let return_aliases: Vec<String> = list_param(params, "return_aliases")?;

        let statement =
            MatchBuilder::new(self.execution.value_binding).build(&patterns, &return_aliases)?;
        let outcome = self
            .run(&statement, TxMode::AutoCommit, "advanced query")
            .await?;

        if outcome.rows.is_empty() {
            Ok(NO_RESULTS.to_string())
        } else {
            Ok(format!(
                "Query succeeded. Results: {}",
                render_rows(FIND_TOOL, &outcome.rows, self.execution.max_result_bytes)
            ))
        }
    }

    async fn run(
        &self,
        statement: &CypherStatement,
        mode: TxMode,
        operation: &str,
    ) -> Result<crate::session::QueryOutcome> {
        run_in_session(self.connector.as_ref(), &self.credentials, statement, mode)
            .await
            .map_err(|e| {
                Neo4jToolError::statement_execution(format!("Error executing {}: {}", operation, e))
            })
    }
}

/// Check the endpoint scheme, then prove the credentials with a trial `RETURN 1`
pub async fn validate_credentials(
    connector: &dyn GraphConnector,
    credentials: &Neo4jCredentials,
) -> Result<()> {
    let attempt = async {
        credentials.check_scheme()?;
        info!("Attempting to connect to Neo4j with URI: {}", credentials.bolt_url);

        run_in_session(
            connector,
            credentials,
            &CypherStatement::new("RETURN 1"),
            TxMode::AutoCommit,
        )
        .await?;
        info!("Neo4j connection successful.");
        Ok::<(), Neo4jToolError>(())
    }
    .await;

    attempt.map_err(|e| {
        error!("Failed to validate Neo4j credentials: {}", e);
        Neo4jToolError::credential_validation(format!("Invalid credentials: {}", e))
    })
}

fn log_tool_call_start(tool_name: &str, params: &JsonValue) {
    info!(
        target: TOOL_PROGRESS_LOG_TARGET,
        tool = tool_name,
        "Tool call started"
    );
    debug!(
        target: TOOL_PROGRESS_LOG_TARGET,
        tool = tool_name,
        "Tool input payload: {}",
        params
    );
}

fn log_tool_call_finish(tool_name: &str, reply: &str) {
    info!(
        target: TOOL_PROGRESS_LOG_TARGET,
        tool = tool_name,
        reply_bytes = reply.len(),
        "Tool call completed"
    );
    debug!(
        target: TOOL_PROGRESS_LOG_TARGET,
        tool = tool_name,
        "Tool output payload: {}",
        reply
    );
}
