use neo4j_tools_core::{Neo4jToolError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// Decode a list parameter given either as a JSON array or as a JSON-encoded string.
///
/// A missing or null parameter is an empty list.
pub fn list_param<T: DeserializeOwned>(params: &JsonValue, key: &str) -> Result<Vec<T>> {
    let decoded = match params.get(key) {
        None | Some(JsonValue::Null) => return Ok(Vec::new()),
        Some(JsonValue::String(encoded)) => serde_json::from_str(encoded),
        Some(value) => serde_json::from_value(value.clone()),
    };

    decoded.map_err(|e| Neo4jToolError::input_validation(format!("Invalid JSON format: {}", e)))
}

/// Required, non-blank string parameter
pub fn required_str<'a>(params: &'a JsonValue, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .and_then(JsonValue::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            Neo4jToolError::input_validation(format!("Missing required parameter: {}", key))
        })
}
