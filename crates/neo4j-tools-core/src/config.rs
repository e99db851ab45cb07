use config as cfg;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::cypher::ValueBinding;
use crate::{Neo4jToolError, Result};

/// Environment variable prefix, e.g. `NEO4J_TOOLS__CREDENTIALS__BOLT_URL`
pub const ENV_PREFIX: &str = "NEO4J_TOOLS";

/// URI schemes accepted for the Bolt endpoint
pub const SUPPORTED_SCHEMES: [&str; 2] = ["bolt://", "neo4j://"];

/// Connection credentials supplied by the orchestration platform
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jCredentials {
    /// Bolt endpoint, e.g. `bolt://localhost:7687`
    pub bolt_url: String,
    pub username: String,
    pub password: SecretString,
}

impl Default for Neo4jCredentials {
    fn default() -> Self {
        Self {
            bolt_url: "bolt://localhost:7687".to_string(),
            username: "neo4j".to_string(),
            password: SecretString::from(String::new()),
        }
    }
}

impl Neo4jCredentials {
    pub fn new(
        bolt_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            bolt_url: bolt_url.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Reject endpoints that are not `bolt://` or `neo4j://`
    pub fn check_scheme(&self) -> Result<()> {
        if SUPPORTED_SCHEMES
            .iter()
            .any(|scheme| self.bolt_url.starts_with(scheme))
        {
            Ok(())
        } else {
            Err(Neo4jToolError::credential_validation(format!(
                "Invalid URI scheme. Supported schemes are: {}",
                SUPPORTED_SCHEMES.join(", ")
            )))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Target database; `None` uses the server default
    pub database: Option<String>,

    /// Rows pulled per fetch from the server
    pub fetch_size: usize,

    /// Upper bound on connections held by one driver instance
    pub max_connections: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            database: None,
            fetch_size: 200,
            max_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// How property and filter values reach the statement
    pub value_binding: ValueBinding,

    /// Rendered result rows beyond this size are truncated
    pub max_result_bytes: usize,

    /// Run the credential check before serving tools
    pub validate_on_startup: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            value_binding: ValueBinding::default(),
            max_result_bytes: 200_000,
            validate_on_startup: true,
        }
    }
}

/// Configuration for the Neo4j tool adapters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Neo4jToolsConfig {
    pub credentials: Neo4jCredentials,
    pub connection: ConnectionConfig,
    pub execution: ExecutionConfig,
}

impl Neo4jToolsConfig {
    /// Load configuration from an optional file, then `NEO4J_TOOLS__*` environment overrides.
    ///
    /// The file format follows its extension (toml, yaml, json).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = cfg::Config::builder();

        if let Some(path) = path {
            info!("Loading config from: {}", path.display());
            builder = builder.add_source(cfg::File::from(path).required(true));
        }

        let settings: Self = builder
            .add_source(
                cfg::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(Some(path.as_ref()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.credentials
            .check_scheme()
            .map_err(|e| Neo4jToolError::config(e.to_string()))?;

        let url = url::Url::parse(&self.credentials.bolt_url)
            .map_err(|e| Neo4jToolError::config(format!("bolt_url is not a valid URI: {}", e)))?;
        if url.host_str().map_or(true, str::is_empty) {
            return Err(Neo4jToolError::config("bolt_url must name a host"));
        }

        if self.credentials.username.trim().is_empty() {
            return Err(Neo4jToolError::config("username must not be empty"));
        }

        if self.connection.fetch_size == 0 {
            return Err(Neo4jToolError::config("fetch_size must be greater than 0"));
        }

        if self.connection.max_connections == 0 {
            return Err(Neo4jToolError::config(
                "max_connections must be greater than 0",
            ));
        }

        if self.execution.max_result_bytes == 0 {
            return Err(Neo4jToolError::config(
                "max_result_bytes must be greater than 0",
            ));
        }

        Ok(())
    }
}
