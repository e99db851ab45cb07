use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::debug;

use super::literal::ValueRenderer;
use super::{CypherStatement, Direction, UpdateCounters, ValueBinding};
use crate::{Neo4jToolError, Result};

/// A node to create. `alias` names it for the relationship clauses that follow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub properties: Option<JsonMap<String, JsonValue>>,
}

impl NodeSpec {
    pub fn new(alias: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            label: Some(label.into()),
            properties: None,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.properties
            .get_or_insert_with(JsonMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// A relationship between two aliases declared in the same request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSpec {
    #[serde(default)]
    pub from_alias: Option<String>,
    #[serde(default)]
    pub to_alias: Option<String>,
    #[serde(default, rename = "type")]
    pub rel_type: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
}

impl RelationshipSpec {
    pub fn new(
        from_alias: impl Into<String>,
        to_alias: impl Into<String>,
        rel_type: impl Into<String>,
    ) -> Self {
        Self {
            from_alias: Some(from_alias.into()),
            to_alias: Some(to_alias.into()),
            rel_type: Some(rel_type.into()),
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    pub fn direction(&self) -> Direction {
        Direction::parse_lenient(self.direction.as_deref())
    }

    /// `(from, to, type)` when all three are present and non-empty
    fn endpoints(&self) -> Option<(&str, &str, &str)> {
        Some((
            non_empty(&self.from_alias)?,
            non_empty(&self.to_alias)?,
            non_empty(&self.rel_type)?,
        ))
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// A creation script and the writes it performs once committed
#[derive(Debug, Clone, PartialEq)]
pub struct InsertPlan {
    pub statement: CypherStatement,
    pub counters: UpdateCounters,
}

/// Builds one multi-line `CREATE` script from node and relationship definitions
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertBuilder {
    binding: ValueBinding,
}

impl InsertBuilder {
    pub fn new(binding: ValueBinding) -> Self {
        Self { binding }
    }

    /// Fails when `nodes` is empty or a node lacks alias or label.
    /// Relationships missing `from_alias`, `to_alias` or `type` are skipped.
    pub fn build(
        &self,
        nodes: &[NodeSpec],
        relationships: &[RelationshipSpec],
    ) -> Result<InsertPlan> {
        if nodes.is_empty() {
            return Err(Neo4jToolError::input_validation(
                "At least one node definition is required.",
            ));
        }

        let mut renderer = ValueRenderer::new(self.binding);
        let mut counters = UpdateCounters::default();
        let mut lines = Vec::with_capacity(nodes.len() + relationships.len() + 1);
        let mut aliases = Vec::with_capacity(nodes.len());

        for node in nodes {
            let (alias, label) = match (non_empty(&node.alias), non_empty(&node.label)) {
                (Some(alias), Some(label)) => (alias, label),
                _ => {
                    return Err(Neo4jToolError::input_validation(
                        "Each node must have 'alias' and 'label'.",
                    ))
                }
            };

            let properties = node
                .properties
                .as_ref()
                .map(|props| renderer.properties(props))
                .unwrap_or_default();
            lines.push(format!("CREATE ({}:{} {{{}}})", alias, label, properties));
            aliases.push(alias);

            counters.nodes_created += 1;
            counters.labels_added += label.split(':').filter(|l| !l.is_empty()).count() as u64;
            counters.properties_set += node
                .properties
                .as_ref()
                .map_or(0, |props| props.values().filter(|v| !v.is_null()).count() as u64);
        }

        // keep every created alias in scope for the relationship clauses
        lines.push(format!("WITH {}", aliases.join(", ")));

        for rel in relationships {
            let Some((from, to, rel_type)) = rel.endpoints() else {
                debug!(?rel, "Skipping incomplete relationship definition");
                continue;
            };

            match rel.direction() {
                Direction::Outgoing => {
                    lines.push(format!("CREATE ({})-[:{}]->({})", from, rel_type, to));
                    counters.relationships_created += 1;
                }
                Direction::Incoming => {
                    lines.push(format!("CREATE ({})<-[:{}]-({})", from, rel_type, to));
                    counters.relationships_created += 1;
                }
                Direction::Bidirectional => {
                    // no undirected edges in the graph model: one edge each way
                    lines.push(format!("CREATE ({})-[:{}]->({})", from, rel_type, to));
                    lines.push(format!("CREATE ({})<-[:{}]-({})", from, rel_type, to));
                    counters.relationships_created += 2;
                }
            }
        }

        Ok(InsertPlan {
            statement: CypherStatement {
                text: lines.join("\n"),
                params: renderer.into_params(),
            },
            counters,
        })
    }
}

/// Render the insert script with values written inline as Cypher literals
pub fn build_insert_statement(
    nodes: &[NodeSpec],
    relationships: &[RelationshipSpec],
) -> Result<String> {
    InsertBuilder::new(ValueBinding::Inline)
        .build(nodes, relationships)
        .map(|plan| plan.statement.text)
}
