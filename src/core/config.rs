//! Configuration management for the MCP server.
//!
//! Configuration is captured once at startup, from defaults overlaid with
//! environment variables, and handed to each tool server at construction.
//! Tool handlers never read the environment themselves.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};

/// Default search API endpoint (Google Custom Search JSON API).
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Which tool servers this process exposes.
    pub tools: ToolsConfig,

    /// Fetch tool server settings.
    pub fetch: HttpClientConfig,

    /// Search tool server settings.
    pub search: SearchConfig,

    /// Time tool server settings.
    pub time: TimeConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// The tool servers a process can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    Fetch,
    Search,
    Time,
}

impl ServerKind {
    pub const ALL: [ServerKind; 3] = [ServerKind::Fetch, ServerKind::Search, ServerKind::Time];
}

impl FromStr for ServerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fetch" => Ok(Self::Fetch),
            "search" | "googlesearch" => Ok(Self::Search),
            "time" | "timeserver" => Ok(Self::Time),
            other => Err(Error::config(format!("unknown tool server: {other}"))),
        }
    }
}

/// Tool selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    pub enabled: Vec<ServerKind>,
}

impl ToolsConfig {
    pub fn is_enabled(&self, kind: ServerKind) -> bool {
        self.enabled.contains(&kind)
    }
}

/// Limits applied to every outbound HTTP call a tool server makes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Whole-exchange timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent sent with every request.
    pub user_agent: String,

    /// Maximum number of response body bytes read.
    pub max_body_size: usize,
}

/// Search tool server settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub http: HttpClientConfig,

    /// Base URL of the search API.
    pub endpoint: String,

    /// Custom Search API key. Empty when not configured.
    pub api_key: String,

    /// Programmable Search Engine id (`cx`). Empty when not configured.
    pub search_engine_id: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("http", &self.http)
            .field("endpoint", &self.endpoint)
            .field(
                "api_key",
                &if self.api_key.is_empty() { "" } else { "[REDACTED]" },
            )
            .field("search_engine_id", &self.search_engine_id)
            .finish()
    }
}

/// Time tool server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// IANA timezone used when a request names none.
    pub default_timezone: String,
}

impl HttpClientConfig {
    fn with_user_agent(user_agent: &str) -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: user_agent.to_string(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Overlay `{prefix}_TIMEOUT`, `{prefix}_USER_AGENT` and `{prefix}_MAX_BODY_SIZE`.
    fn apply_env(&mut self, prefix: &str) {
        if let Some(timeout) = parse_env(&format!("{prefix}_TIMEOUT")) {
            self.timeout_secs = timeout;
        }
        if let Ok(user_agent) = std::env::var(format!("{prefix}_USER_AGENT")) {
            self.user_agent = user_agent;
        }
        if let Some(max_body_size) = parse_env(&format!("{prefix}_MAX_BODY_SIZE")) {
            self.max_body_size = max_body_size;
        }
    }

    fn validate(&self, section: &str) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::config(format!("{section}: timeout must be at least 1 second")));
        }
        if self.max_body_size == 0 {
            return Err(Error::config(format!("{section}: max body size must be positive")));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            http: HttpClientConfig::with_user_agent("MCP-GoogleSearch-Server/1.0"),
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            api_key: String::new(),
            search_engine_id: String::new(),
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            default_timezone: "Asia/Seoul".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "web-tools-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            tools: ToolsConfig {
                enabled: ServerKind::ALL.to_vec(),
            },
            fetch: HttpClientConfig::with_user_agent("MCP-Fetch-Server/1.0"),
            search: SearchConfig::default(),
            time: TimeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Variables are prefixed with `MCP_`, e.g. `MCP_FETCH_TIMEOUT`. The search
    /// credentials also fall back to the bare `API_KEY` and `SEARCH_ENGINE_ID`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        if let Ok(tools) = std::env::var("MCP_TOOLS") {
            let mut enabled = Vec::new();
            for name in tools.split(',').filter(|s| !s.trim().is_empty()) {
                match name.parse::<ServerKind>() {
                    Ok(kind) if !enabled.contains(&kind) => enabled.push(kind),
                    Ok(_) => {}
                    Err(e) => warn!("Ignoring MCP_TOOLS entry: {}", e),
                }
            }
            config.tools.enabled = enabled;
        }

        config.fetch.apply_env("MCP_FETCH");
        config.search.http.apply_env("MCP_SEARCH");

        if let Ok(endpoint) = std::env::var("MCP_SEARCH_ENDPOINT") {
            config.search.endpoint = endpoint;
        }

        config.search.api_key = env_with_fallback("MCP_SEARCH_API_KEY", "API_KEY");
        config.search.search_engine_id =
            env_with_fallback("MCP_SEARCH_ENGINE_ID", "SEARCH_ENGINE_ID");

        if config.tools.is_enabled(ServerKind::Search) {
            if config.search.api_key.is_empty() || config.search.search_engine_id.is_empty() {
                warn!(
                    "Search API key or search engine id not configured. \
                     The server will start but searches will fail."
                );
            } else {
                info!("Search credentials loaded from environment");
            }
        }

        if let Ok(timezone) = std::env::var("MCP_DEFAULT_TIMEZONE") {
            config.time.default_timezone = timezone;
        }

        config
    }

    /// Reject settings no tool server could run with.
    pub fn validate(&self) -> Result<()> {
        if self.tools.enabled.is_empty() {
            return Err(Error::config("no tool servers enabled"));
        }
        if self.tools.is_enabled(ServerKind::Fetch) {
            self.fetch.validate("fetch")?;
        }
        if self.tools.is_enabled(ServerKind::Search) {
            self.search.http.validate("search")?;
            reqwest::Url::parse(&self.search.endpoint).map_err(|e| {
                Error::config(format!("search endpoint {}: {e}", self.search.endpoint))
            })?;
        }
        if self.tools.is_enabled(ServerKind::Time) && !self.time.default_timezone.is_empty() {
            Tz::from_str(&self.time.default_timezone).map_err(|_| {
                Error::config(format!(
                    "unknown default timezone: {}",
                    self.time.default_timezone
                ))
            })?;
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}: not a valid number: {}", key, raw);
            None
        }
    }
}

fn env_with_fallback(primary: &str, fallback: &str) -> String {
    std::env::var(primary)
        .or_else(|_| std::env::var(fallback))
        .unwrap_or_default()
}

// Env var tests anywhere in the crate run serially under this lock.
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
