//! Search API status tool.
//!
//! Reports whether the search credentials are configured. It never fails:
//! missing configuration is the answer, not an error.

use rmcp::{
    ErrorData as McpError,
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::core::config::SearchConfig;
use crate::domains::tools::handlers::{ToolHandler, text_result};

pub const API_KEY_MISSING: &str = "Error: API key is not configured. Please set the API_KEY environment variable or use the -api-key flag.";
pub const ENGINE_ID_MISSING: &str = "Error: Search Engine ID is not configured. Please set the SEARCH_ENGINE_ID environment variable or use the -search-engine-id flag.";
pub const CONFIGURED: &str = "Google Search API is properly configured and ready to use.";

/// The status tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ApiStatusParams {}

/// Search API status tool.
pub struct ApiStatusTool {
    api_key_set: bool,
    search_engine_id_set: bool,
}

impl ApiStatusTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getApiStatus";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Checks if the Google API configuration is valid";

    pub fn new(config: &SearchConfig) -> Self {
        Self {
            api_key_set: !config.api_key.is_empty(),
            search_engine_id_set: !config.search_engine_id.is_empty(),
        }
    }

    /// The status message for the current configuration.
    pub fn status(&self) -> &'static str {
        info!("Checking API configuration");
        if !self.api_key_set {
            API_KEY_MISSING
        } else if !self.search_engine_id_set {
            ENGINE_ID_MISSING
        } else {
            CONFIGURED
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for ApiStatusTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn to_tool(&self) -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ApiStatusParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Arguments are ignored so the call can never be rejected.
    async fn call(&self, _arguments: JsonObject) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.status()))
    }
}
