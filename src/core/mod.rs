//! Core module containing shared infrastructure components.
//!
//! Configuration, start-up errors, the MCP server handler and the transport
//! layer live here. Tool behavior lives in `domains::tools`.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
