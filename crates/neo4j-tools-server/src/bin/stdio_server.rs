use anyhow::{Context, Result};
use clap::Parser;
use neo4j_tools::{validate_credentials, BoltConnector};
use neo4j_tools_core::Neo4jToolsConfig;
use neo4j_tools_server::Neo4jMcpServer;
use rmcp::{transport::stdio, ServiceExt};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Serve the Neo4j tools over MCP stdio
#[derive(Parser, Debug)]
#[command(name = "neo4j-tools-stdio", version, about)]
struct Cli {
    /// Configuration file (toml, yaml or json); NEO4J_TOOLS__* variables override it
    #[arg(short, long, env = "NEO4J_TOOLS_CONFIG")]
    config: Option<PathBuf>,

    /// Check the credentials against the server and exit
    #[arg(long)]
    validate: bool,

    /// Start serving without the credential check
    #[arg(long)]
    skip_startup_check: bool,

    /// Record statements instead of sending them to a server
    #[arg(long, conflicts_with = "validate")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let config = Neo4jToolsConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        uri = %config.credentials.bolt_url,
        user = %config.credentials.username,
        database = ?config.connection.database,
        "Configuration loaded and validated"
    );

    let check_credentials = cli.validate
        || (config.execution.validate_on_startup && !cli.skip_startup_check && !cli.dry_run);
    if check_credentials {
        let connector = BoltConnector::new(config.connection.clone());
        validate_credentials(&connector, &config.credentials).await?;
    }
    if cli.validate {
        info!("Credentials are valid");
        return Ok(());
    }

    if cli.dry_run {
        warn!("Dry-run mode: statements are recorded, nothing reaches the database");
    }

    let server = Neo4jMcpServer::from_config(&config, cli.dry_run);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("Error starting server: {}", e);
    })?;

    info!("Neo4j tools MCP server started on STDIO transport");

    match service.waiting().await {
        Ok(_) => info!("Server shut down gracefully"),
        Err(e) => error!("Server error: {}", e),
    }

    Ok(())
}
