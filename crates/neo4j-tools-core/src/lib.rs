// ABOUTME: Pure building blocks for the Neo4j tool adapters
// ABOUTME: Cypher statement builders, credentials/configuration and the shared error type

pub mod config;
pub mod cypher;
pub mod error;

pub use config::*;
pub use cypher::{
    build_insert_statement, build_match_statement, CypherStatement, Direction, InsertBuilder,
    InsertPlan, MatchBuilder, NodePattern, NodeSpec, PatternFragment, RelationshipPattern,
    RelationshipSpec, StatementKind, UpdateCounters, ValueBinding,
};
pub use error::{Neo4jToolError, Result};
