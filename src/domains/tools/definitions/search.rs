//! Google search tool.
//!
//! Queries the Google Custom Search JSON API and renders the results as a
//! numbered text list.

use std::fmt::Write as _;
use std::sync::Arc;

use reqwest::{Method, Url};
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::core::config::SearchConfig;
use crate::domains::tools::binder::{bind, non_empty, truncate};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolHandler, text_result};
use crate::domains::tools::outbound::{CallExecutor, OutboundCall};

/// Result count used when none (or a non-positive one) is requested.
const DEFAULT_NUM: i64 = 5;
/// The API returns at most ten results per page.
const MAX_NUM: i64 = 10;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SearchGoogleParams {
    #[schemars(description = "The search query string")]
    pub query: String,

    #[serde(default)]
    #[schemars(description = "Number of search results to return (max 10, default 5)")]
    pub num: Option<f64>,

    #[serde(default)]
    #[schemars(description = "Index of the first result to return (starts at 1)")]
    pub start: Option<f64>,

    #[serde(default)]
    #[schemars(description = "Language for search results (e.g., 'en', 'ko', 'ja'). Defaults to 'en'")]
    pub language: Option<String>,

    #[serde(default)]
    #[schemars(description = "Country code for search context (e.g., 'us', 'kr', 'jp'). Defaults to 'us'")]
    pub country: Option<String>,

    #[serde(default, rename = "safeSearch")]
    #[schemars(description = "Whether to filter out adult content (default: true)")]
    pub safe_search: Option<bool>,
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Always within 1..=10.
    pub num: i64,
    /// Always at least 1.
    pub start: i64,
    pub language: String,
    pub country: String,
    pub safe_search: bool,
}

/// Clamp a requested result count: non-positive means "default".
pub fn clamp_num(requested: Option<f64>) -> i64 {
    match requested.map(truncate) {
        None => DEFAULT_NUM,
        Some(n) if n <= 0 => DEFAULT_NUM,
        Some(n) => n.min(MAX_NUM),
    }
}

impl TryFrom<SearchGoogleParams> for SearchRequest {
    type Error = ToolError;

    fn try_from(params: SearchGoogleParams) -> Result<Self, ToolError> {
        if params.query.is_empty() {
            return Err(ToolError::invalid_parameters("Search query cannot be empty"));
        }

        Ok(Self {
            query: params.query,
            num: clamp_num(params.num),
            start: params.start.map(truncate).filter(|s| *s > 0).unwrap_or(1),
            language: non_empty(params.language).unwrap_or_else(|| "en".to_string()),
            country: non_empty(params.country).unwrap_or_else(|| "us".to_string()),
            safe_search: params.safe_search.unwrap_or(true),
        })
    }
}

/// Fail unless both credentials are present.
pub fn check_credentials(config: &SearchConfig) -> Result<(), ToolError> {
    if config.api_key.is_empty() {
        return Err(ToolError::missing_configuration("API key is not configured"));
    }
    if config.search_engine_id.is_empty() {
        return Err(ToolError::missing_configuration(
            "Search Engine ID is not configured",
        ));
    }
    Ok(())
}

impl SearchRequest {
    /// Build the outbound API call. Pure: no I/O.
    pub fn to_call(&self, config: &SearchConfig) -> Result<OutboundCall, ToolError> {
        check_credentials(config)?;

        let mut query: Vec<(&str, String)> = vec![
            ("q", self.query.clone()),
            ("key", config.api_key.clone()),
            ("cx", config.search_engine_id.clone()),
            ("num", self.num.to_string()),
            ("start", self.start.to_string()),
        ];
        if !self.language.is_empty() {
            query.push(("lr", format!("lang_{}", self.language)));
        }
        if !self.country.is_empty() {
            query.push(("gl", self.country.clone()));
        }
        let safe = if self.safe_search { "active" } else { "off" };
        query.push(("safe", safe.to_string()));

        let encoded = serde_urlencoded::to_string(&query)
            .map_err(|e| ToolError::invalid_parameters(e.to_string()))?;
        let mut url = Url::parse(&config.endpoint).map_err(|e| {
            ToolError::missing_configuration(format!("Search endpoint is not a valid URL: {e}"))
        })?;
        url.set_query(Some(&encoded));

        let mut call = OutboundCall::new(Method::GET, url);
        call.set_header("User-Agent", &config.http.user_agent)?;
        call.set_header("Accept", "application/json")?;
        Ok(call)
    }
}

// ============================================================================
// Upstream Response
// ============================================================================

/// The subset of the Custom Search response the report uses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchApiResponse {
    #[serde(default)]
    pub items: Option<Vec<SearchItem>>,
    #[serde(default)]
    pub search_information: Option<SearchInformation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub display_link: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInformation {
    #[serde(default)]
    pub formatted_total_results: String,
    #[serde(default)]
    pub formatted_search_time: String,
}

/// Render search results as text.
pub fn format_search(query: &str, response: &SearchApiResponse) -> String {
    let (total, time) = response
        .search_information
        .as_ref()
        .map(|info| {
            (
                info.formatted_total_results.as_str(),
                info.formatted_search_time.as_str(),
            )
        })
        .unwrap_or(("", ""));

    let mut out = format!("Google Search Results for: {query}\n\n");
    let _ = write!(out, "Found approximately {total} results in {time} seconds\n\n");

    let items = response.items.as_deref().unwrap_or_default();
    if items.is_empty() {
        out.push_str("No results found.");
        return out;
    }

    for (i, item) in items.iter().enumerate() {
        let _ = write!(
            out,
            "{}. {}\n   URL: {}\n   {}\n\n",
            i + 1,
            item.title,
            item.link,
            item.snippet
        );
    }
    out
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Google search tool.
pub struct SearchGoogleTool {
    config: SearchConfig,
    executor: Arc<dyn CallExecutor>,
}

impl SearchGoogleTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "searchGoogle";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Performs a Google search and returns the results";

    pub fn new(config: SearchConfig, executor: Arc<dyn CallExecutor>) -> Self {
        info!(
            "Search tool created: timeout={}s, userAgent={}, maxBodySize={}",
            config.http.timeout_secs, config.http.user_agent, config.http.max_body_size
        );
        Self { config, executor }
    }

    /// Run the search pipeline: credentials, bind, build, execute, parse, format.
    #[instrument(skip_all)]
    pub async fn execute(&self, arguments: JsonObject) -> Result<String, ToolError> {
        info!("Starting Google search request processing");

        check_credentials(&self.config).inspect_err(|e| error!("{}", e))?;

        let params: SearchGoogleParams = bind(arguments)?;
        let request = SearchRequest::try_from(params).inspect_err(|e| warn!("{}", e))?;
        info!(
            "Google search request: Query={}, Num={}, Start={}, Language={}, Country={}, SafeSearch={}",
            request.query,
            request.num,
            request.start,
            request.language,
            request.country,
            request.safe_search
        );

        let call = request.to_call(&self.config)?;
        let outcome = self.executor.execute(call).await?;

        let response: SearchApiResponse = serde_json::from_slice(&outcome.body).map_err(|e| {
            error!("Failed to parse API response: {}", e);
            ToolError::malformed_response(e.to_string())
        })?;

        info!("Google search request completed successfully");
        Ok(format_search(&request.query, &response))
    }
}

#[async_trait::async_trait]
impl ToolHandler for SearchGoogleTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn to_tool(&self) -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SearchGoogleParams>(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::HttpClientConfig;
    use crate::domains::tools::definitions::testing::{RecordingExecutor, args, outcome};
    use crate::domains::tools::outbound::HttpExecutor;
    use std::collections::HashMap;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> SearchConfig {
        SearchConfig {
            http: HttpClientConfig {
                timeout_secs: 5,
                user_agent: "MCP-GoogleSearch-Server/1.0".to_string(),
                max_body_size: 1024 * 1024,
            },
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            api_key: "test-key".to_string(),
            search_engine_id: "test-cx".to_string(),
        }
    }

    fn request(value: serde_json::Value) -> Result<SearchRequest, ToolError> {
        SearchRequest::try_from(bind::<SearchGoogleParams>(args(value))?)
    }

    fn query_map(call: &OutboundCall) -> HashMap<String, String> {
        call.url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_clamp_num() {
        assert_eq!(clamp_num(None), 5);
        assert_eq!(clamp_num(Some(0.0)), 5);
        assert_eq!(clamp_num(Some(-3.0)), 5);
        assert_eq!(clamp_num(Some(0.9)), 5);
        assert_eq!(clamp_num(Some(1.0)), 1);
        assert_eq!(clamp_num(Some(7.8)), 7);
        assert_eq!(clamp_num(Some(10.0)), 10);
        assert_eq!(clamp_num(Some(11.0)), 10);
        assert_eq!(clamp_num(Some(1e9)), 10);
    }

    #[test]
    fn test_defaults() {
        let req = request(serde_json::json!({ "query": "rust" })).unwrap();
        assert_eq!(
            req,
            SearchRequest {
                query: "rust".to_string(),
                num: 5,
                start: 1,
                language: "en".to_string(),
                country: "us".to_string(),
                safe_search: true,
            }
        );
    }

    #[test]
    fn test_start_offset_floor() {
        let req = request(serde_json::json!({ "query": "q", "start": 0 })).unwrap();
        assert_eq!(req.start, 1);
        let req = request(serde_json::json!({ "query": "q", "start": 11.7 })).unwrap();
        assert_eq!(req.start, 11);
    }

    #[test]
    fn test_empty_query_rejected_verbatim() {
        let err = request(serde_json::json!({ "query": "" })).unwrap_err();
        assert_eq!(err, ToolError::invalid_parameters("Search query cannot be empty"));

        // Whitespace is not trimmed away.
        assert!(request(serde_json::json!({ "query": " " })).is_ok());
    }

    #[test]
    fn test_missing_query_names_field() {
        let err = request(serde_json::json!({ "num": 3 })).unwrap_err();
        assert!(err.to_string().contains("query"));
    }

    #[test]
    fn test_build_query_parameters() {
        let req = request(serde_json::json!({
            "query": "rust & tokio",
            "num": 3,
            "start": 4,
            "language": "ko",
            "country": "kr",
            "safeSearch": false
        }))
        .unwrap();
        let call = req.to_call(&config()).unwrap();
        let q = query_map(&call);

        assert_eq!(call.method, Method::GET);
        assert_eq!(call.url.path(), "/customsearch/v1");
        assert_eq!(q["q"], "rust & tokio");
        assert_eq!(q["key"], "test-key");
        assert_eq!(q["cx"], "test-cx");
        assert_eq!(q["num"], "3");
        assert_eq!(q["start"], "4");
        assert_eq!(q["lr"], "lang_ko");
        assert_eq!(q["gl"], "kr");
        assert_eq!(q["safe"], "off");
        assert_eq!(call.header("Accept"), Some("application/json"));
        assert_eq!(call.header("User-Agent"), Some("MCP-GoogleSearch-Server/1.0"));
    }

    #[test]
    fn test_build_requires_credentials() {
        let req = request(serde_json::json!({ "query": "x" })).unwrap();

        let mut cfg = config();
        cfg.api_key.clear();
        assert_eq!(
            req.to_call(&cfg).unwrap_err(),
            ToolError::missing_configuration("API key is not configured")
        );

        let mut cfg = config();
        cfg.search_engine_id.clear();
        assert_eq!(
            req.to_call(&cfg).unwrap_err(),
            ToolError::missing_configuration("Search Engine ID is not configured")
        );
    }

    #[test]
    fn test_format_zero_results() {
        let response: SearchApiResponse = serde_json::from_str(
            r#"{"searchInformation": {"formattedTotalResults": "0", "formattedSearchTime": "0.12"}}"#,
        )
        .unwrap();
        assert_eq!(
            format_search("nothing", &response),
            "Google Search Results for: nothing\n\n\
             Found approximately 0 results in 0.12 seconds\n\n\
             No results found."
        );
    }

    #[test]
    fn test_format_missing_search_information() {
        let response = SearchApiResponse::default();
        let text = format_search("q", &response);
        assert!(text.contains("Found approximately  results in  seconds\n\nNo results found."));
    }

    #[test]
    fn test_format_two_results_in_order() {
        let response: SearchApiResponse = serde_json::from_str(
            r#"{
                "searchInformation": {"formattedTotalResults": "1,234", "formattedSearchTime": "0.31"},
                "items": [
                    {"title": "First", "link": "https://a.example", "snippet": "alpha", "displayLink": "a.example"},
                    {"title": "Second", "link": "https://b.example", "snippet": "beta"}
                ]
            }"#,
        )
        .unwrap();
        let text = format_search("rust", &response);
        assert_eq!(
            text,
            "Google Search Results for: rust\n\n\
             Found approximately 1,234 results in 0.31 seconds\n\n\
             1. First\n   URL: https://a.example\n   alpha\n\n\
             2. Second\n   URL: https://b.example\n   beta\n\n"
        );
        assert!(!text.contains("3. "));
        assert!(!text.contains("No results found."));
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_call() {
        let executor = Arc::new(RecordingExecutor::default());
        let tool = SearchGoogleTool::new(config(), executor.clone());

        let err = tool
            .execute(args(serde_json::json!({ "query": "" })))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_make_no_call() {
        let executor = Arc::new(RecordingExecutor::default());
        let mut cfg = config();
        cfg.api_key.clear();
        cfg.search_engine_id.clear();
        let tool = SearchGoogleTool::new(cfg, executor.clone());

        let err = tool
            .call(args(serde_json::json!({ "query": "rust" })))
            .await
            .unwrap_err();
        assert_eq!(err.message, "API key is not configured");
        assert_eq!(err.data.unwrap()["kind"], "MissingConfiguration");
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn test_clamped_num_reaches_the_call() {
        let executor = Arc::new(RecordingExecutor::replying(outcome(200, &[], "{}")));
        let tool = SearchGoogleTool::new(config(), executor.clone());

        let text = tool
            .execute(args(serde_json::json!({ "query": "rust", "num": 25 })))
            .await
            .unwrap();
        assert!(text.ends_with("No results found."));

        let call = executor.last_call().unwrap();
        assert_eq!(query_map(&call)["num"], "10");
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed_response() {
        let executor = Arc::new(RecordingExecutor::replying(outcome(200, &[], "<html>")));
        let tool = SearchGoogleTool::new(config(), executor);

        let err = tool
            .execute(args(serde_json::json!({ "query": "rust" })))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "MalformedResponse");
    }

    #[tokio::test]
    async fn test_search_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("q", "rust lang"))
            .and(query_param("num", "2"))
            .and(query_param("safe", "active"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "kind": "customsearch#search",
                "searchInformation": {
                    "searchTime": 0.2,
                    "formattedSearchTime": "0.20",
                    "totalResults": "2",
                    "formattedTotalResults": "2"
                },
                "items": [
                    {"title": "Rust", "link": "https://www.rust-lang.org", "snippet": "A language"},
                    {"title": "Docs", "link": "https://doc.rust-lang.org", "snippet": "Docs"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut cfg = config();
        cfg.endpoint = format!("{}/customsearch/v1", server.uri());
        let executor = Arc::new(HttpExecutor::new(&cfg.http).unwrap());
        let tool = SearchGoogleTool::new(cfg, executor);

        let text = tool
            .execute(args(serde_json::json!({ "query": "rust lang", "num": 2 })))
            .await
            .unwrap();
        assert!(text.starts_with("Google Search Results for: rust lang\n\n"));
        assert!(text.contains("Found approximately 2 results in 0.20 seconds"));
        assert!(text.contains("1. Rust\n   URL: https://www.rust-lang.org\n   A language"));
        assert!(text.contains("2. Docs"));
    }

    #[tokio::test]
    async fn test_search_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("{\"error\": \"quota\"}"))
            .mount(&server)
            .await;

        let mut cfg = config();
        cfg.endpoint = server.uri();
        let executor = Arc::new(HttpExecutor::new(&cfg.http).unwrap());
        let tool = SearchGoogleTool::new(cfg, executor);

        let err = tool
            .execute(args(serde_json::json!({ "query": "rust" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UpstreamError { status: 403, .. }));
        assert!(err.to_string().contains("quota"));
    }
}
