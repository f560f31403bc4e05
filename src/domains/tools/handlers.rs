//! Tool handler trait and route construction.
//!
//! Every exposed operation implements [`ToolHandler`]. The same handler
//! object serves the rmcp router (STDIO/TCP) and the registry dispatch used
//! by the HTTP transport, so both paths bind, call and format identically.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, Content, JsonObject, Tool},
};

/// A single MCP tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Tool name as registered in MCP.
    fn name(&self) -> &'static str;

    /// Tool metadata, including the input schema.
    fn to_tool(&self) -> Tool;

    /// Handle one invocation.
    ///
    /// Classified failures come back as `Err`, never as success text.
    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, McpError>;
}

/// Wrap a handler in a rmcp route.
pub fn route_for<S>(handler: Arc<dyn ToolHandler>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(handler.to_tool(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let handler = handler.clone();
        async move { handler.call(args).await }.boxed()
    })
}

/// Successful single-text result.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}
