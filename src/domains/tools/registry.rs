//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - Construction of every enabled tool from configuration
//! - Dispatch for tool calls arriving over the HTTP transport
//! - Tool metadata for listing

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject, Tool},
};
use tracing::{info, warn};

use crate::core::config::{Config, ServerKind};
use crate::core::error::Result;

use super::definitions::{ApiStatusTool, FetchUrlTool, GetCurrentTimeTool, SearchGoogleTool};
use super::handlers::ToolHandler;
use super::outbound::{CallExecutor, HttpExecutor};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - owns one handler per exposed tool.
///
/// Both the rmcp router and the HTTP transport read from the same registry,
/// so the tool set is identical across transports.
#[derive(Clone)]
pub struct ToolRegistry {
    handlers: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Build the handlers for every enabled tool server.
    ///
    /// Each HTTP-backed server gets its own client so timeouts and user
    /// agents stay independent.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut handlers: Vec<Arc<dyn ToolHandler>> = Vec::new();

        for kind in &config.tools.enabled {
            match kind {
                ServerKind::Fetch => {
                    let executor: Arc<dyn CallExecutor> =
                        Arc::new(HttpExecutor::new(&config.fetch)?);
                    handlers.push(Arc::new(FetchUrlTool::new(config.fetch.clone(), executor)));
                }
                ServerKind::Search => {
                    let executor: Arc<dyn CallExecutor> =
                        Arc::new(HttpExecutor::new(&config.search.http)?);
                    handlers.push(Arc::new(SearchGoogleTool::new(
                        config.search.clone(),
                        executor,
                    )));
                    handlers.push(Arc::new(ApiStatusTool::new(&config.search)));
                }
                ServerKind::Time => {
                    handlers.push(Arc::new(GetCurrentTimeTool::new(&config.time)));
                }
            }
        }

        let registry = Self { handlers };
        info!("Registered tools: {}", registry.tool_names().join(", "));
        Ok(registry)
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.handlers.iter().map(|h| h.to_tool()).collect()
    }

    /// Handlers in registration order.
    pub fn handlers(&self) -> &[Arc<dyn ToolHandler>] {
        &self.handlers
    }

    /// Dispatch a tool call to the matching handler.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.handlers.iter().find(|h| h.name() == name) {
            Some(handler) => handler.call(arguments).await,
            None => {
                warn!("Unknown tool requested: {}", name);
                Err(McpError::invalid_params(format!("Unknown tool: {}", name), None))
            }
        }
    }
}
