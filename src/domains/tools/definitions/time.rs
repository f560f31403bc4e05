//! Current time tool.
//!
//! Converts "now", or a given RFC3339 instant, into a named IANA timezone.
//! No network involved.

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::core::config::TimeConfig;
use crate::domains::tools::binder::{bind, non_empty};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolHandler, text_result};

/// Parameters for the time tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetCurrentTimeParams {
    #[serde(default)]
    #[schemars(description = "Timezone to query the time for (e.g., Asia/Seoul, UTC)")]
    pub timezone: Option<String>,

    #[serde(default, rename = "timeStr")]
    #[schemars(
        description = "RFC3339 formatted time string to convert (e.g., 2025-04-06T14:30:00Z). If empty, current time is used"
    )]
    pub time_str: Option<String>,
}

/// A validated time request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRequest {
    pub timezone: Option<String>,
    pub time_str: Option<String>,
}

impl From<GetCurrentTimeParams> for TimeRequest {
    fn from(params: GetCurrentTimeParams) -> Self {
        Self {
            timezone: non_empty(params.timezone),
            time_str: non_empty(params.time_str),
        }
    }
}

/// A resolved timezone together with the instant rendered in it.
///
/// Only ever produced whole: conversion either yields both parts or an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedTime {
    pub timezone: String,
    pub time: DateTime<Tz>,
}

impl ConvertedTime {
    /// RFC3339 at second precision, `Z` for a zero offset.
    pub fn to_rfc3339(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Parse a strict RFC3339 timestamp.
///
/// chrono also accepts a lowercase `t` or a space between date and time, and
/// a lowercase `z` designator; those are rejected here.
pub fn parse_rfc3339(input: &str) -> Result<DateTime<Utc>, ToolError> {
    if input.as_bytes().get(10) != Some(&b'T') || input.ends_with('z') {
        return Err(ToolError::invalid_time_format(input));
    }
    DateTime::parse_from_rfc3339(input)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ToolError::invalid_time_format(format!("{input}: {e}")))
}

/// Resolve the timezone, resolve the base instant, render.
///
/// `now` is only consulted when `time_str` is absent. An empty resolved name
/// means UTC.
pub fn convert_time(
    request: &TimeRequest,
    default_timezone: &str,
    now: DateTime<Utc>,
) -> Result<ConvertedTime, ToolError> {
    let timezone = match &request.timezone {
        Some(tz) => tz.clone(),
        None => {
            info!("Using default timezone: {}", default_timezone);
            default_timezone.to_string()
        }
    };

    let tz: Tz = if timezone.is_empty() {
        Tz::UTC
    } else {
        timezone.parse().map_err(|_| {
            warn!("Invalid timezone: {}", timezone);
            ToolError::invalid_timezone(timezone.clone())
        })?
    };

    let instant = match &request.time_str {
        None => now,
        Some(raw) => parse_rfc3339(raw).inspect_err(|e| warn!("{}", e))?,
    };

    Ok(ConvertedTime {
        timezone,
        time: instant.with_timezone(&tz),
    })
}

/// Render the time report.
pub fn format_time(request: &TimeRequest, converted: &ConvertedTime) -> String {
    let label = if request.time_str.is_none() {
        "Current time"
    } else {
        "Converted time"
    };
    format!("{} ({}): {}", label, converted.timezone, converted.to_rfc3339())
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Time tool.
pub struct GetCurrentTimeTool {
    default_timezone: String,
}

impl GetCurrentTimeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getCurrentTime";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Returns the time for the specified timezone. If a time string is provided, it converts that time; otherwise, it returns the current time.";

    pub fn new(config: &TimeConfig) -> Self {
        info!("Time tool created: default timezone={}", config.default_timezone);
        Self {
            default_timezone: config.default_timezone.clone(),
        }
    }

    #[instrument(skip_all)]
    pub fn execute(&self, arguments: JsonObject) -> Result<String, ToolError> {
        info!("Starting time request processing");

        let request = TimeRequest::from(bind::<GetCurrentTimeParams>(arguments)?);
        info!(
            "Parameters: timezone={}, timeStr={}",
            request.timezone.as_deref().unwrap_or(""),
            request.time_str.as_deref().unwrap_or("")
        );

        let converted = convert_time(&request, &self.default_timezone, Utc::now())?;

        info!("Time request processing completed");
        Ok(format_time(&request, &converted))
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetCurrentTimeTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn to_tool(&self) -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetCurrentTimeParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.execute(arguments)?))
    }
}
