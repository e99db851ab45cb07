// ABOUTME: JSON schemas for the Neo4j tools
// ABOUTME: Names, descriptions and parameter shapes published to the orchestration platform

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

pub const QUERY_TOOL: &str = "neo4j_query";
pub const ADD_TEXT_TOOL: &str = "neo4j_add_text";
pub const ADD_TOOL: &str = "neo4j_add";
pub const FIND_TOOL: &str = "neo4j_find";

/// Tool schema for function calling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: JsonValue,
}

/// Collection of all Neo4j tool schemas
pub struct Neo4jToolSchemas;

impl Neo4jToolSchemas {
    pub fn all() -> Vec<ToolSchema> {
        vec![Self::query(), Self::add_text(), Self::add(), Self::find()]
    }

    pub fn query() -> ToolSchema {
        ToolSchema {
            name: QUERY_TOOL.to_string(),
            description: "Run a Cypher statement against the Neo4j database in one transaction. \
                Read statements return their rows as JSON; write and schema statements report \
                the number of rows they returned."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Cypher statement to execute"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    pub fn add_text() -> ToolSchema {
        ToolSchema {
            name: ADD_TEXT_TOOL.to_string(),
            description: "Store a piece of text as a new :Text node with a `content` property."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Text to store"
                    }
                },
                "required": ["text"]
            }),
        }
    }

    pub fn add() -> ToolSchema {
        ToolSchema {
            name: ADD_TOOL.to_string(),
            description: "Create nodes and the relationships between them in one transaction. \
                Relationships refer to nodes by the aliases declared in the same call. \
                A call with nodes only ends in a WITH line that the server may reject, \
                so include at least one relationship."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "nodes": {
                        "description": "Nodes to create, as an array or a JSON-encoded string",
                        "type": ["array", "string"],
                        "items": {
                            "type": "object",
                            "properties": {
                                "alias": {
                                    "type": "string",
                                    "description": "Name used by relationships below"
                                },
                                "label": {
                                    "type": "string",
                                    "description": "Node label, e.g. Person"
                                },
                                "properties": {
                                    "type": "object",
                                    "description": "Property map for the node"
                                }
                            },
                            "required": ["alias", "label"]
                        }
                    },
                    "relationships": {
                        "description":
                            "Relationships to create, as an array or a JSON-encoded string",
                        "type": ["array", "string"],
                        "items": {
                            "type": "object",
                            "properties": {
                                "from_alias": {"type": "string"},
                                "to_alias": {"type": "string"},
                                "type": {
                                    "type": "string",
                                    "description": "Relationship type, e.g. KNOWS"
                                },
                                "direction": {
                                    "type": "string",
                                    "enum": ["OUTGOING", "INCOMING", "BIDIRECTIONAL"],
                                    "default": "OUTGOING"
                                }
                            },
                            "required": ["from_alias", "to_alias", "type"]
                        }
                    }
                },
                "required": ["nodes"]
            }),
        }
    }

    pub fn find() -> ToolSchema {
        ToolSchema {
            name: FIND_TOOL.to_string(),
            description: "Match a path of node and relationship patterns and return the \
                matched nodes. Patterns alternate node, relationship, node, ..."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "patterns": {
                        "description": "Path elements, as an array or a JSON-encoded string. \
                            Nodes carry `label` (plus optional `alias` and `filters`); \
                            relationships carry `relationship_type` and optional `direction`.",
                        "type": ["array", "string"],
                        "items": {
                            "type": "object",
                            "properties": {
                                "alias": {"type": "string"},
                                "label": {"type": "string"},
                                "filters": {"type": "object"},
                                "relationship_type": {"type": "string"},
                                "direction": {
                                    "type": "string",
                                    "enum": ["OUTGOING", "INCOMING", "BIDIRECTIONAL"]
                                }
                            }
                        }
                    },
                    "return_aliases": {
                        "description": "Aliases to return; defaults to every aliased node",
                        "type": ["array", "string"],
                        "items": {"type": "string"}
                    }
                },
                "required": ["patterns"]
            }),
        }
    }

    pub fn get_by_name(name: &str) -> Option<ToolSchema> {
        Self::all().into_iter().find(|s| s.name == name)
    }

    pub fn tool_names() -> Vec<String> {
        Self::all().into_iter().map(|s| s.name).collect()
    }
}
