use thiserror::Error;

pub type Result<T> = std::result::Result<T, Neo4jToolError>;

#[derive(Error, Debug)]
pub enum Neo4jToolError {
    /// Bad URI scheme, or the trial connection was refused.
    #[error("{0}")]
    CredentialValidation(String),

    #[error("{0}")]
    InputValidation(String),

    /// The database rejected or failed the generated statement.
    #[error("{0}")]
    StatementExecution(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Neo4jToolError {
    pub fn credential_validation(msg: impl Into<String>) -> Self {
        Self::CredentialValidation(msg.into())
    }

    pub fn input_validation(msg: impl Into<String>) -> Self {
        Self::InputValidation(msg.into())
    }

    pub fn statement_execution(msg: impl Into<String>) -> Self {
        Self::StatementExecution(msg.into())
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for failures caused by the caller's parameters rather than the database.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InputValidation(_) | Self::UnknownTool(_))
    }
}

impl From<config::ConfigError> for Neo4jToolError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
