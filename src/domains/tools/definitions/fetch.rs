//! HTTP fetch tool.
//!
//! Fetches an arbitrary `http://` or `https://` URL with any method and
//! reports the status, headers and (capped) body back to the client.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use reqwest::{Method, Url};
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::core::config::HttpClientConfig;
use crate::domains::tools::binder::{bind, non_empty};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolHandler, text_result};
use crate::domains::tools::outbound::{CallExecutor, CallOutcome, OutboundCall};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the fetch tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FetchUrlParams {
    /// The URL to fetch.
    #[schemars(description = "The URL to fetch data from (must be a valid HTTP/HTTPS URL)")]
    pub url: String,

    #[serde(default)]
    #[schemars(
        description = "HTTP method to use (GET, POST, PUT, DELETE, PATCH). Defaults to GET if not specified."
    )]
    pub method: Option<String>,

    #[serde(default)]
    #[schemars(description = "Request body for POST, PUT, PATCH requests")]
    pub body: Option<String>,

    #[serde(default, rename = "contentType")]
    #[schemars(
        description = "Content-Type header for the request. For POST requests with a body, defaults to application/json"
    )]
    pub content_type: Option<String>,

    #[serde(default)]
    #[schemars(description = "JSON string containing additional headers to send with the request")]
    pub headers: Option<String>,
}

/// A validated fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub method: String,
    pub body: Option<String>,
    pub content_type: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl TryFrom<FetchUrlParams> for FetchRequest {
    type Error = ToolError;

    fn try_from(params: FetchUrlParams) -> Result<Self, ToolError> {
        if !params.url.starts_with("http://") && !params.url.starts_with("https://") {
            return Err(ToolError::invalid_parameters(
                "URL must begin with http:// or https://",
            ));
        }

        let headers = match non_empty(params.headers) {
            Some(raw) => serde_json::from_str::<HashMap<String, String>>(&raw)
                .map_err(|e| ToolError::invalid_parameters(format!("invalid headers JSON: {e}")))?
                .into_iter()
                .collect(),
            None => BTreeMap::new(),
        };

        Ok(Self {
            url: params.url,
            method: non_empty(params.method).unwrap_or_else(|| "GET".to_string()),
            body: non_empty(params.body),
            content_type: non_empty(params.content_type),
            headers,
        })
    }
}

impl FetchRequest {
    /// Build the outbound call. Pure: no I/O.
    ///
    /// Header precedence, lowest first: User-Agent, Content-Type, custom headers.
    pub fn to_call(&self, http: &HttpClientConfig) -> Result<OutboundCall, ToolError> {
        let method = Method::from_bytes(self.method.as_bytes()).map_err(|_| {
            ToolError::invalid_parameters(format!("invalid HTTP method: {}", self.method))
        })?;
        let url = Url::parse(&self.url)
            .map_err(|e| ToolError::invalid_parameters(format!("invalid URL: {e}")))?;

        let mut call = OutboundCall::new(method, url);
        call.set_header("User-Agent", &http.user_agent)?;

        if let Some(content_type) = &self.content_type {
            call.set_header("Content-Type", content_type)?;
        } else if self.body.is_some() && matches!(self.method.as_str(), "POST" | "PUT" | "PATCH")
        {
            call.set_header("Content-Type", "application/json")?;
        }

        for (name, value) in &self.headers {
            call.set_header(name, value)?;
        }

        call.body = self.body.clone();
        Ok(call)
    }
}

// ============================================================================
// Report
// ============================================================================

/// Structured part of the fetch report.
#[derive(Debug, Clone, Serialize)]
struct FetchReport<'a> {
    status_code: u16,
    headers: &'a BTreeMap<String, String>,
    body: String,
    url: &'a str,
    method: &'a str,
}

/// Render a completed fetch as text.
pub fn format_fetch(request: &FetchRequest, outcome: &CallOutcome) -> Result<String, ToolError> {
    let report = FetchReport {
        status_code: outcome.status,
        headers: &outcome.headers,
        body: outcome.body_text(),
        url: &request.url,
        method: &request.method,
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| ToolError::malformed_response(e.to_string()))?;

    Ok(format!(
        "Response from {} (status: {}):\n{}",
        request.url, outcome.status, json
    ))
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Fetch tool - performs one bounded HTTP request per invocation.
pub struct FetchUrlTool {
    http: HttpClientConfig,
    executor: Arc<dyn CallExecutor>,
}

impl FetchUrlTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "fetchURL";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetches data from a URL using HTTP/HTTPS. Supports GET, POST, PUT, DELETE, PATCH methods.";

    pub fn new(http: HttpClientConfig, executor: Arc<dyn CallExecutor>) -> Self {
        info!(
            "Fetch tool created: timeout={}s, userAgent={}, maxBodySize={}",
            http.timeout_secs, http.user_agent, http.max_body_size
        );
        Self { http, executor }
    }

    /// Run the fetch pipeline: bind, build, execute, format.
    #[instrument(skip_all)]
    pub async fn execute(&self, arguments: JsonObject) -> Result<String, ToolError> {
        info!("Starting fetch request processing");

        let params: FetchUrlParams = bind(arguments)?;
        let request = FetchRequest::try_from(params).inspect_err(|e| warn!("{}", e))?;
        info!("Fetch request: URL={}, Method={}", request.url, request.method);

        let call = request.to_call(&self.http).inspect_err(|e| warn!("{}", e))?;
        let outcome = self.executor.execute(call).await?;

        info!("Fetch request completed with status: {}", outcome.status);
        format_fetch(&request, &outcome)
    }
}

#[async_trait::async_trait]
impl ToolHandler for FetchUrlTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn to_tool(&self) -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<FetchUrlParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.execute(arguments).await?))
    }
}

// ============================================================================
// Tests
// ============================================================================
