use neo4j_tools::{
    validate_credentials, DryRunConnector, Neo4jToolExecutor, Row, TxMode, ADD_TOOL, FIND_TOOL,
    QUERY_TOOL,
};
use neo4j_tools_core::{ExecutionConfig, Neo4jCredentials, Neo4jToolError, ValueBinding};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

fn row(value: JsonValue) -> Row {
    value.as_object().cloned().unwrap()
}

fn executor_with(connector: &DryRunConnector, execution: ExecutionConfig) -> Neo4jToolExecutor {
    Neo4jToolExecutor::new(
        Arc::new(connector.clone()),
        Neo4jCredentials::new("bolt://localhost:7687", "neo4j", "secret"),
        execution,
    )
}

fn executor(connector: &DryRunConnector) -> Neo4jToolExecutor {
    executor_with(connector, ExecutionConfig::default())
}

fn inline() -> ExecutionConfig {
    ExecutionConfig {
        value_binding: ValueBinding::Inline,
        ..ExecutionConfig::default()
    }
}

#[tokio::test]
async fn query_read_with_rows_renders_results() {
    let connector = DryRunConnector::new();
    connector.push_rows(vec![row(json!({"name": "Alice"})), row(json!({"name": "Bob"}))]);

    let reply = executor(&connector)
        .execute(QUERY_TOOL, json!({"query": "MATCH (n:Person) RETURN n.name AS name"}))
        .await
        .unwrap();

    assert_eq!(
        reply,
        r#"Query succeeded. Results: [{"name":"Alice"},{"name":"Bob"}]"#
    );
    let recorded = connector.last_statement().unwrap();
    assert_eq!(recorded.mode, TxMode::Explicit);
    assert_eq!(connector.sessions_closed(), 1);
}

#[tokio::test]
async fn query_read_without_rows_is_not_an_error() {
    let connector = DryRunConnector::new();
    let reply = executor(&connector)
        .execute(QUERY_TOOL, json!({"query": "MATCH (n:Missing) RETURN n"}))
        .await
        .unwrap();

    assert_eq!(reply, "Query succeeded but returned no results.");
}

#[tokio::test]
async fn query_write_reports_kind_and_row_count() {
    let connector = DryRunConnector::new();
    let reply = executor(&connector)
        .execute(QUERY_TOOL, json!({"query": "MATCH (n:Temp) DETACH DELETE n"}))
        .await
        .unwrap();
    assert_eq!(reply, "Query executed successfully (write). Rows returned: 0");

    connector.push_rows(vec![row(json!({"id": 7}))]);
    let reply = executor(&connector)
        .execute(QUERY_TOOL, json!({"query": "CREATE (n:Temp) RETURN id(n) AS id"}))
        .await
        .unwrap();
    assert_eq!(
        reply,
        "Query executed successfully (write). Rows returned: 1\n[{\"id\":7}]"
    );
}

#[tokio::test]
async fn query_schema_statement_is_classified() {
    let connector = DryRunConnector::new();
    let reply = executor(&connector)
        .execute(
            QUERY_TOOL,
            json!({"query": "CREATE INDEX person_name FOR (p:Person) ON (p.name)"}),
        )
        .await
        .unwrap();

    assert!(reply.starts_with("Query executed successfully (schema)."));
}

#[tokio::test]
async fn query_without_text_opens_no_session() {
    let connector = DryRunConnector::new();
    let err = executor(&connector)
        .execute(QUERY_TOOL, json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Neo4jToolError::InputValidation(_)));
    assert_eq!(connector.sessions_opened(), 0);
}

#[tokio::test]
async fn database_failure_is_wrapped_and_session_released() {
    let connector = DryRunConnector::new();
    connector.fail_run("Neo.ClientError.Statement.SyntaxError");

    let err = executor(&connector)
        .execute(QUERY_TOOL, json!({"query": "MATCH (n RETURN n"}))
        .await
        .unwrap_err();

    assert!(matches!(err, Neo4jToolError::StatementExecution(_)));
    assert_eq!(
        err.to_string(),
        "Error executing query: Neo.ClientError.Statement.SyntaxError"
    );
    assert_eq!(connector.sessions_opened(), 1);
    assert_eq!(connector.sessions_closed(), 1);
}

#[tokio::test]
async fn add_reports_counters_from_the_creation_script() {
    let connector = DryRunConnector::new();
    let params = json!({
        "nodes": [
            {"alias": "alice", "label": "Person", "properties": {"name": "Alice", "age": 30}},
            {"alias": "bob", "label": "Person", "properties": {"name": "Bob"}}
        ],
        "relationships": [
            {"from_alias": "alice", "to_alias": "bob", "type": "KNOWS"}
        ]
    });

    let reply = executor(&connector).execute(ADD_TOOL, params).await.unwrap();

    assert_eq!(
        reply,
        "Insert operation succeeded. Modification details: \
         {nodes_created: 2, relationships_created: 1, properties_set: 3, labels_added: 2}"
    );

    let recorded = connector.last_statement().unwrap();
    assert_eq!(recorded.mode, TxMode::Explicit);
    assert!(recorded.statement.text.contains("CREATE (alice:Person {name: $p0, age: $p1})"));
    assert!(recorded.statement.text.contains("CREATE (alice)-[:KNOWS]->(bob)"));
    assert_eq!(recorded.statement.params["p0"], "Alice");
    assert_eq!(recorded.statement.params["p1"], 30);
}

#[tokio::test]
async fn add_accepts_json_encoded_lists() {
    let connector = DryRunConnector::new();
    let params = json!({
        "nodes": "[{\"alias\": \"t\", \"label\": \"Tag\", \"properties\": {\"name\": \"rust\"}}]",
        "relationships": "[]"
    });

    let reply = executor_with(&connector, inline())
        .execute(ADD_TOOL, params)
        .await
        .unwrap();

    assert!(reply.starts_with("Insert operation succeeded."));
    let text = connector.last_statement().unwrap().statement.text;
    assert!(text.contains("CREATE (t:Tag {name: 'rust'})"));
}

#[tokio::test]
async fn add_rejects_bad_input_before_connecting() {
    let connector = DryRunConnector::new();
    let exec = executor(&connector);

    let err = exec.execute(ADD_TOOL, json!({"nodes": []})).await.unwrap_err();
    assert_eq!(err.to_string(), "At least one node definition is required.");

    let err = exec
        .execute(ADD_TOOL, json!({"nodes": [{"alias": "a"}]}))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Each node must have 'alias' and 'label'.");

    let err = exec
        .execute(ADD_TOOL, json!({"nodes": "{not json"}))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Invalid JSON format: "));

    assert_eq!(connector.sessions_opened(), 0);
}

#[tokio::test]
async fn add_failure_uses_insert_wording() {
    let connector = DryRunConnector::new();
    connector.fail_run("constraint violation");

    let err = executor(&connector)
        .execute(ADD_TOOL, json!({"nodes": [{"alias": "a", "label": "Person"}]}))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Error executing insert: constraint violation");
    assert_eq!(connector.sessions_closed(), 1);
}

#[tokio::test]
async fn find_runs_auto_commit_and_renders_nodes() {
    let connector = DryRunConnector::new();
    connector.push_rows(vec![row(json!({
        "a": {"name": "Alice", "_labels": ["Person"]},
        "b": {"name": "Bob", "_labels": ["Person"]}
    }))]);

    let params = json!({
        "patterns": [
            {"alias": "a", "label": "Person", "filters": {"name": "Alice"}},
            {"relationship_type": "KNOWS", "direction": "OUTGOING"},
            {"alias": "b", "label": "Person"}
        ],
        "return_aliases": ["a", "b"]
    });

    let reply = executor_with(&connector, inline())
        .execute(FIND_TOOL, params)
        .await
        .unwrap();

    assert!(reply.starts_with("Query succeeded. Results: "));
    assert!(reply.contains(r#""_labels":["Person"]"#));

    let recorded = connector.last_statement().unwrap();
    assert_eq!(recorded.mode, TxMode::AutoCommit);
    assert_eq!(
        recorded.statement.text,
        "MATCH (a:Person {name: 'Alice'})-[:KNOWS]->(b:Person)\nRETURN a, b"
    );
}

#[tokio::test]
async fn find_without_rows_and_without_patterns() {
    let connector = DryRunConnector::new();
    let exec = executor(&connector);

    let reply = exec
        .execute(FIND_TOOL, json!({"patterns": [{"label": "Person"}]}))
        .await
        .unwrap();
    assert_eq!(reply, "Query succeeded but returned no results.");

    let err = exec.execute(FIND_TOOL, json!({})).await.unwrap_err();
    assert!(matches!(err, Neo4jToolError::InputValidation(_)));
    assert_eq!(connector.sessions_opened(), 1);
}

#[tokio::test]
async fn find_rejects_node_fragment_with_mistyped_filters() {
    let connector = DryRunConnector::new();
    let params = json!({
        "patterns": [
            {"alias": "a", "label": "Person", "filters": []},
            {"relationship_type": "KNOWS"},
            {"alias": "b", "label": "Person"}
        ]
    });

    let err = executor(&connector)
        .execute(FIND_TOOL, params)
        .await
        .unwrap_err();

    assert!(matches!(err, Neo4jToolError::InputValidation(_)));
    assert!(err.to_string().contains("Invalid node pattern"));
    assert_eq!(connector.sessions_opened(), 0);
}

#[tokio::test]
async fn find_failure_uses_advanced_query_wording() {
    let connector = DryRunConnector::new();
    connector.fail_open("connection refused");

    let err = executor(&connector)
        .execute(FIND_TOOL, json!({"patterns": [{"label": "Person"}]}))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error executing advanced query: connection refused"
    );
}

#[tokio::test]
async fn oversized_results_are_truncated_to_whole_rows() {
    let connector = DryRunConnector::new();
    connector.push_rows((0..50).map(|i| row(json!({"i": i}))).collect());

    let execution = ExecutionConfig {
        max_result_bytes: 40,
        ..ExecutionConfig::default()
    };
    let reply = executor_with(&connector, execution)
        .execute(QUERY_TOOL, json!({"query": "UNWIND range(0, 49) AS i RETURN i"}))
        .await
        .unwrap();

    assert!(reply.contains("more rows truncated)"));
    assert!(reply.starts_with(r#"Query succeeded. Results: [{"i":0}"#));
}

#[tokio::test]
async fn credentials_validate_with_trial_statement() {
    let connector = DryRunConnector::new();
    let creds = Neo4jCredentials::new("neo4j://db.internal:7687", "neo4j", "secret");

    validate_credentials(&connector, &creds).await.unwrap();

    let recorded = connector.last_statement().unwrap();
    assert_eq!(recorded.statement.text, "RETURN 1");
    assert_eq!(connector.sessions_closed(), 1);
}

#[tokio::test]
async fn credentials_with_bad_scheme_never_connect() {
    let connector = DryRunConnector::new();
    let creds = Neo4jCredentials::new("http://localhost:7474", "neo4j", "secret");

    let err = validate_credentials(&connector, &creds).await.unwrap_err();

    assert!(matches!(err, Neo4jToolError::CredentialValidation(_)));
    assert_eq!(
        err.to_string(),
        "Invalid credentials: Invalid URI scheme. Supported schemes are: bolt://, neo4j://"
    );
    assert_eq!(connector.sessions_opened(), 0);
}

#[tokio::test]
async fn credentials_rejected_by_server() {
    let connector = DryRunConnector::new();
    connector.fail_run("authentication failure");

    let err = validate_credentials(&connector, &Neo4jCredentials::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials: authentication failure");
    assert_eq!(connector.sessions_closed(), 1);
}
