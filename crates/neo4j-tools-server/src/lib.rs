// ABOUTME: MCP server exposing the Neo4j tools to an orchestration platform
// ABOUTME: Thin rmcp layer mapping tool calls onto Neo4jToolExecutor

use neo4j_tools::{
    BoltConnector, DryRunConnector, GraphConnector, Neo4jToolExecutor, ADD_TEXT_TOOL, ADD_TOOL,
    FIND_TOOL, QUERY_TOOL,
};
use neo4j_tools_core::{Neo4jToolError, Neo4jToolsConfig};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::future::Future;
use std::sync::Arc;

const INSTRUCTIONS: &str = "Tools for reading and writing a Neo4j graph database. \
    Use neo4j_find for structured pattern lookups, neo4j_add to create nodes and relationships, \
    neo4j_add_text to store free text and neo4j_query for any other Cypher statement.";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct QueryRequest {
    /// Cypher statement to execute
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddTextRequest {
    /// Text stored as the `content` of a new :Text node
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddRequest {
    /// Nodes to create: objects with `alias`, `label` and optional `properties`.
    /// An array or a JSON-encoded string.
    pub nodes: JsonValue,
    /// Relationships between declared aliases: `from_alias`, `to_alias`, `type`
    /// and optional `direction` (OUTGOING, INCOMING, BIDIRECTIONAL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<JsonValue>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindRequest {
    /// Path elements alternating node (`label`, `alias`, `filters`) and
    /// relationship (`relationship_type`, `direction`) objects
    pub patterns: JsonValue,
    /// Aliases to return; defaults to every aliased node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_aliases: Option<JsonValue>,
}

/// Caller mistakes become `invalid_params`, everything else `internal_error`
pub fn to_mcp_error(err: Neo4jToolError) -> McpError {
    if err.is_caller_error() {
        McpError::invalid_params(err.to_string(), None)
    } else {
        McpError::internal_error(err.to_string(), None)
    }
}

#[derive(Clone)]
pub struct Neo4jMcpServer {
    executor: Arc<Neo4jToolExecutor>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl Neo4jMcpServer {
    pub fn new(executor: Arc<Neo4jToolExecutor>) -> Self {
        Self {
            executor,
            tool_router: Self::tool_router(),
        }
    }

    /// Server backed by Bolt, or by the recording connector when `dry_run` is set
    pub fn from_config(config: &Neo4jToolsConfig, dry_run: bool) -> Self {
        let connector: Arc<dyn GraphConnector> = if dry_run {
            Arc::new(DryRunConnector::new())
        } else {
            Arc::new(BoltConnector::new(config.connection.clone()))
        };

        Self::new(Arc::new(Neo4jToolExecutor::new(
            connector,
            config.credentials.clone(),
            config.execution.clone(),
        )))
    }

    #[tool(
        description = "Run a Cypher statement in one transaction. Read statements return rows \
            as JSON; write and schema statements report how many rows they returned. \
            Required: query."
    )]
    async fn neo4j_query(
        &self,
        params: Parameters<QueryRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.call(QUERY_TOOL, &params.0).await
    }

    #[tool(description = "Store text as a new :Text node with a content property. Required: text.")]
    async fn neo4j_add_text(
        &self,
        params: Parameters<AddTextRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.call(ADD_TEXT_TOOL, &params.0).await
    }

    #[tool(
        description = "Create nodes and relationships in one transaction and report what was \
            created. A call with nodes only ends in a WITH line that the server may reject, \
            so include at least one relationship. Required: nodes. Optional: relationships."
    )]
    async fn neo4j_add(&self, params: Parameters<AddRequest>) -> Result<CallToolResult, McpError> {
        self.call(ADD_TOOL, &params.0).await
    }

    #[tool(
        description = "Find nodes matching a path of node and relationship patterns. \
            Required: patterns. Optional: return_aliases."
    )]
    async fn neo4j_find(
        &self,
        params: Parameters<FindRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.call(FIND_TOOL, &params.0).await
    }
}

impl Neo4jMcpServer {
    async fn call<R: Serialize>(
        &self,
        tool_name: &str,
        request: &R,
    ) -> Result<CallToolResult, McpError> {
        let params = serde_json::to_value(request)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let text = self
            .executor
            .execute(tool_name, params)
            .await
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for Neo4jMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo4j_tools_core::{ExecutionConfig, Neo4jCredentials};
    use rmcp::model::ErrorCode;
    use serde_json::json;

    fn server(connector: &DryRunConnector) -> Neo4jMcpServer {
        Neo4jMcpServer::new(Arc::new(Neo4jToolExecutor::new(
            Arc::new(connector.clone()),
            Neo4jCredentials::default(),
            ExecutionConfig::default(),
        )))
    }

    fn reply_text(result: &CallToolResult) -> String {
        let value = serde_json::to_value(result).unwrap();
        value["content"][0]["text"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_router_lists_all_tools() {
        let mut names: Vec<String> = Neo4jMcpServer::tool_router()
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["neo4j_add", "neo4j_add_text", "neo4j_find", "neo4j_query"]);
    }

    #[test]
    fn test_add_tool_description_warns_about_node_only_calls() {
        let add = Neo4jMcpServer::tool_router()
            .list_all()
            .into_iter()
            .find(|tool| tool.name == "neo4j_add")
            .unwrap();
        let description = add.description.unwrap_or_default();
        assert!(description.contains("include at least one relationship"));
    }

    #[test]
    fn test_info_enables_tools() {
        let info = server(&DryRunConnector::new()).get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("neo4j_query"));
    }

    #[tokio::test]
    async fn test_add_text_tool_replies_with_text() {
        let connector = DryRunConnector::new();
        let result = server(&connector)
            .neo4j_add_text(Parameters(AddTextRequest {
                text: "hello".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(reply_text(&result), "Node added successfully.");
        assert_eq!(connector.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_add_tool_accepts_encoded_nodes() {
        let connector = DryRunConnector::new();
        let result = server(&connector)
            .neo4j_add(Parameters(AddRequest {
                nodes: json!("[{\"alias\": \"a\", \"label\": \"Person\"}]"),
                relationships: None,
            }))
            .await
            .unwrap();

        assert!(reply_text(&result).starts_with("Insert operation succeeded."));
    }

    #[tokio::test]
    async fn test_input_errors_map_to_invalid_params() {
        let connector = DryRunConnector::new();
        let err = server(&connector)
            .neo4j_find(Parameters(FindRequest {
                patterns: json!([]),
                return_aliases: None,
            }))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "No patterns provided for advanced query.");
    }

    #[tokio::test]
    async fn test_database_errors_map_to_internal_error() {
        let connector = DryRunConnector::new();
        connector.fail_run("Neo.TransientError.General.DatabaseUnavailable");

        let err = server(&connector)
            .neo4j_query(Parameters(QueryRequest {
                query: "MATCH (n) RETURN n".to_string(),
            }))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(
            err.message,
            "Error executing query: Neo.TransientError.General.DatabaseUnavailable"
        );
    }
}
