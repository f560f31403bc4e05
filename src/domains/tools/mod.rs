//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `binder.rs` - Argument map to typed parameters
//! - `outbound/` - Request execution and bounded body reading
//! - `handlers.rs` - The `ToolHandler` trait shared by every tool
//! - `registry.rs` - Tool instances built from configuration, plus dispatch
//! - `router.rs` - rmcp `ToolRouter` built from the registry
//! - `error.rs` - Tool failure categories
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` implementing `ToolHandler`
//! 2. Export it in `definitions/mod.rs`
//! 3. Construct it in `ToolRegistry::from_config`
//!
//! The router and the HTTP dispatch both read from the registry.

mod binder;
pub mod definitions;
mod error;
mod handlers;
pub mod outbound;
mod registry;
pub mod router;

pub use error::ToolError;
pub use handlers::*;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
