//! Web tools MCP server.
//!
//! Exposes four MCP tools over STDIO, TCP or HTTP:
//!
//! - **fetchURL**: bounded HTTP fetch with a JSON report of the response
//! - **searchGoogle**: Google Custom Search, formatted as a numbered list
//! - **getApiStatus**: whether the search credentials are configured
//! - **getCurrentTime**: current or given RFC3339 time in an IANA timezone
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server handler, transports
//! - **domains::tools**: tool definitions and the shared outbound pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use web_tools_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     config.validate()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
