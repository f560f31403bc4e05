//! MCP Server Entry Point
//!
//! Loads configuration, initializes logging, validates the configuration and
//! starts the server with the configured transport.

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use web_tools_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging comes up before the config load so its warnings are visible.
    dotenvy::dotenv().ok();
    init_logging(&std::env::var("MCP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

    let config = Config::from_env();

    info!("Starting {} v{}", config.server.name, config.server.version);

    config.validate().context("invalid configuration")?;

    let server = McpServer::new(config.clone()).context("failed to build tool servers")?;

    info!("Server initialized");

    TransportService::new(config.transport).run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr: on the STDIO transport stdout is the protocol
/// channel.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
