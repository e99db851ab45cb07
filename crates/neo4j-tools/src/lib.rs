// ABOUTME: Neo4j tool adapters (query, text insert, structured insert, pattern find)
// ABOUTME: Provides Neo4jToolExecutor, tool schemas and the Bolt/dry-run session implementations

pub mod bolt;
pub mod dry_run;
pub mod params;
pub mod render;
pub mod session;
pub mod tool_executor;
pub mod tool_schemas;

pub use bolt::BoltConnector;
pub use dry_run::{DryRunConnector, RecordedStatement};
pub use session::{run_in_session, GraphConnector, GraphSession, QueryOutcome, Row, TxMode};
pub use tool_executor::*;
pub use tool_schemas::*;
