use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::debug;

use super::literal::ValueRenderer;
use super::{CypherStatement, Direction, ValueBinding};
use crate::{Neo4jToolError, Result};

/// `(alias:label {filters})`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePattern {
    #[serde(default)]
    pub alias: Option<String>,
    pub label: String,
    #[serde(default)]
    pub filters: Option<JsonMap<String, JsonValue>>,
}

/// `-[:TYPE]->` and friends, joining the node patterns around it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipPattern {
    pub relationship_type: String,
    #[serde(default)]
    pub direction: Option<String>,
}

/// One element of a path description.
///
/// An object with a `label` is a node, one with a `relationship_type` is a
/// relationship; anything else is kept as `Other` and ignored by the builder.
/// Once the keys pick a node or relationship, its fields must have the right types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PatternFragment {
    Node(NodePattern),
    Relationship(RelationshipPattern),
    Other(JsonValue),
}

impl TryFrom<JsonValue> for PatternFragment {
    type Error = Neo4jToolError;

    fn try_from(value: JsonValue) -> Result<Self> {
        let (is_node, is_relationship) = match &value {
            JsonValue::Object(map) => (
                map.contains_key("label"),
                map.contains_key("relationship_type"),
            ),
            _ => (false, false),
        };

        if is_node {
            serde_json::from_value(value).map(Self::Node).map_err(|e| {
                Neo4jToolError::input_validation(format!("Invalid node pattern: {}", e))
            })
        } else if is_relationship {
            serde_json::from_value(value)
                .map(Self::Relationship)
                .map_err(|e| {
                    Neo4jToolError::input_validation(format!("Invalid relationship pattern: {}", e))
                })
        } else {
            Ok(Self::Other(value))
        }
    }
}

impl<'de> Deserialize<'de> for PatternFragment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Self::try_from(value).map_err(de::Error::custom)
    }
}

impl PatternFragment {
    pub fn node(alias: Option<&str>, label: impl Into<String>) -> Self {
        Self::Node(NodePattern {
            alias: alias.map(str::to_string),
            label: label.into(),
            filters: None,
        })
    }

    pub fn relationship(relationship_type: impl Into<String>, direction: Option<&str>) -> Self {
        Self::Relationship(RelationshipPattern {
            relationship_type: relationship_type.into(),
            direction: direction.map(str::to_string),
        })
    }

    /// Add a property filter; no-op on non-node fragments
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        if let Self::Node(node) = &mut self {
            node.filters
                .get_or_insert_with(JsonMap::new)
                .insert(key.into(), value.into());
        }
        self
    }
}

impl RelationshipPattern {
    pub fn direction(&self) -> Direction {
        Direction::parse_lenient(self.direction.as_deref())
    }

    fn arrow(&self) -> String {
        let rel_type = &self.relationship_type;
        match self.direction() {
            Direction::Outgoing => format!("-[:{}]->", rel_type),
            Direction::Incoming => format!("<-[:{}]-", rel_type),
            Direction::Bidirectional => format!("-[:{}]-", rel_type),
        }
    }
}

/// Builds a `MATCH ... RETURN ...` statement from a left-to-right fragment list
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchBuilder {
    binding: ValueBinding,
}

impl MatchBuilder {
    pub fn new(binding: ValueBinding) -> Self {
        Self { binding }
    }

    /// A relationship fragment is consumed only directly after a node fragment;
    /// leading or repeated relationship fragments are dropped.
    pub fn build(
        &self,
        patterns: &[PatternFragment],
        return_aliases: &[String],
    ) -> Result<CypherStatement> {
        if patterns.is_empty() {
            return Err(Neo4jToolError::input_validation(
                "No patterns provided for advanced query.",
            ));
        }

        let mut renderer = ValueRenderer::new(self.binding);
        let mut parts = Vec::with_capacity(patterns.len());
        let mut i = 0;

        while i < patterns.len() {
            match &patterns[i] {
                PatternFragment::Node(node) => {
                    let alias = node
                        .alias
                        .clone()
                        .filter(|a| !a.is_empty())
                        .unwrap_or_else(|| format!("node{}", i));
                    let filters = node
                        .filters
                        .as_ref()
                        .map(|f| renderer.properties(f))
                        .unwrap_or_default();

                    if filters.is_empty() {
                        parts.push(format!("({}:{})", alias, node.label));
                    } else {
                        parts.push(format!("({}:{} {{{}}})", alias, node.label, filters));
                    }
                    i += 1;

                    if let Some(PatternFragment::Relationship(rel)) = patterns.get(i) {
                        parts.push(rel.arrow());
                        i += 1;
                    }
                }
                PatternFragment::Relationship(rel) => {
                    debug!(
                        index = i,
                        relationship_type = %rel.relationship_type,
                        "Dropping relationship fragment without a preceding node"
                    );
                    i += 1;
                }
                PatternFragment::Other(_) => {
                    debug!(index = i, "Dropping unrecognized pattern fragment");
                    i += 1;
                }
            }
        }

        let text = format!(
            "MATCH {}\n{}",
            parts.concat(),
            return_clause(patterns, return_aliases)
        );

        Ok(CypherStatement {
            text,
            params: renderer.into_params(),
        })
    }
}

fn return_clause(patterns: &[PatternFragment], return_aliases: &[String]) -> String {
    if !return_aliases.is_empty() {
        return format!("RETURN {}", return_aliases.join(", "));
    }

    // only aliases the caller declared; `node<i>` placeholders are not projected
    let declared: Vec<&str> = patterns
        .iter()
        .filter_map(|fragment| match fragment {
            PatternFragment::Node(node) => node.alias.as_deref().filter(|a| !a.is_empty()),
            _ => None,
        })
        .collect();

    if declared.is_empty() {
        "RETURN *".to_string()
    } else {
        format!("RETURN {}", declared.join(", "))
    }
}

/// Render the match statement with filter values written inline as Cypher literals
pub fn build_match_statement(
    patterns: &[PatternFragment],
    return_aliases: &[String],
) -> Result<String> {
    MatchBuilder::new(ValueBinding::Inline)
        .build(patterns, return_aliases)
        .map(|statement| statement.text)
}
