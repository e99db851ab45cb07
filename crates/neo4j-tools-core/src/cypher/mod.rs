//! Cypher statement construction for the structured insert and pattern-query tools.
//!
//! Both builders are pure: structured input in, statement text (plus bound
//! parameters) out. Labels, aliases, relationship types and property keys are
//! written into the statement as given; only values can be bound as parameters.

pub mod classify;
pub mod insert;
pub mod literal;
pub mod pattern;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::fmt;

pub use classify::StatementKind;
pub use insert::{build_insert_statement, InsertBuilder, InsertPlan, NodeSpec, RelationshipSpec};
pub use literal::format_literal;
pub use pattern::{
    build_match_statement, MatchBuilder, NodePattern, PatternFragment, RelationshipPattern,
};

/// How property and filter values are placed into a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueBinding {
    /// Values become `$p0`, `$p1`, ... and travel in [`CypherStatement::params`]
    #[default]
    Parameters,
    /// Values are rendered as Cypher literals inside the statement text
    Inline,
}

/// Statement text together with the parameters it references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CypherStatement {
    pub text: String,
    #[serde(default)]
    pub params: JsonMap<String, JsonValue>,
}

impl CypherStatement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: JsonMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

impl fmt::Display for CypherStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Relationship direction as written by the caller.
///
/// Parsing is lenient: matching ignores case, and anything unrecognized
/// (including a missing value) is treated as [`Direction::Outgoing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Outgoing,
    Incoming,
    Bidirectional,
}

impl Direction {
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("INCOMING") => Self::Incoming,
            Some("BIDIRECTIONAL") => Self::Bidirectional,
            _ => Self::Outgoing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outgoing => "OUTGOING",
            Self::Incoming => "INCOMING",
            Self::Bidirectional => "BIDIRECTIONAL",
        }
    }
}

/// Write counters for a statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCounters {
    pub nodes_created: u64,
    pub relationships_created: u64,
    pub properties_set: u64,
    pub labels_added: u64,
}

impl UpdateCounters {
    pub fn contains_updates(&self) -> bool {
        self.nodes_created > 0
            || self.relationships_created > 0
            || self.properties_set > 0
            || self.labels_added > 0
    }
}

impl fmt::Display for UpdateCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{nodes_created: {}, relationships_created: {}, \
             properties_set: {}, labels_added: {}}}",
            self.nodes_created, self.relationships_created, self.properties_set, self.labels_added
        )
    }
}
