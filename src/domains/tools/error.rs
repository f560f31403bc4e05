//! Tool-specific error types.
//!
//! Every failure a tool can report is classified here. The classification
//! decides how the error reaches the MCP client: caller mistakes become
//! `invalid_params`, everything else becomes `internal_error`. Both carry the
//! kind in the error data so clients can tell them apart.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Upper bound on how much upstream body text is echoed in an error message.
const UPSTREAM_PREVIEW_CHARS: usize = 1024;

/// Errors that can occur during tool operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Malformed, missing or out-of-range caller input.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The server lacks credentials the tool needs.
    #[error("{0}")]
    MissingConfiguration(String),

    /// The request never produced a response (DNS, refused connection, TLS...).
    #[error("Request failed: {0}")]
    TransportFailure(String),

    /// The configured timeout expired before the exchange completed.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// A response arrived with a non-success status.
    #[error("Upstream error (status code: {status}): {body}")]
    UpstreamError { status: u16, body: String },

    /// The response body stream failed for a reason other than the size cap.
    #[error("Failed to read response body: {0}")]
    ReadFailure(String),

    /// A success response whose payload could not be understood.
    #[error("Failed to parse upstream response: {0}")]
    MalformedResponse(String),

    /// The timezone identifier is not in the IANA database.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The source timestamp is not strict RFC3339.
    #[error("Invalid time format (expected RFC3339, e.g. 2025-04-06T14:30:00Z): {0}")]
    InvalidTimeFormat(String),
}

impl ToolError {
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }

    pub fn missing_configuration(msg: impl Into<String>) -> Self {
        Self::MissingConfiguration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportFailure(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn read_failure(msg: impl Into<String>) -> Self {
        Self::ReadFailure(msg.into())
    }

    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn invalid_timezone(msg: impl Into<String>) -> Self {
        Self::InvalidTimezone(msg.into())
    }

    pub fn invalid_time_format(msg: impl Into<String>) -> Self {
        Self::InvalidTimeFormat(msg.into())
    }

    /// Build an upstream error from a status code and the (already capped) body.
    pub fn upstream(status: u16, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        let body = match text.char_indices().nth(UPSTREAM_PREVIEW_CHARS) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.into_owned(),
        };
        Self::UpstreamError { status, body }
    }

    /// Stable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameters(_) => "InvalidParameters",
            Self::MissingConfiguration(_) => "MissingConfiguration",
            Self::TransportFailure(_) => "TransportFailure",
            Self::Timeout(_) => "Timeout",
            Self::UpstreamError { .. } => "UpstreamError",
            Self::ReadFailure(_) => "ReadFailure",
            Self::MalformedResponse(_) => "MalformedResponse",
            Self::InvalidTimezone(_) => "InvalidTimezone",
            Self::InvalidTimeFormat(_) => "InvalidTimeFormat",
        }
    }

    /// Whether the caller can fix this by changing the arguments.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameters(_) | Self::InvalidTimezone(_) | Self::InvalidTimeFormat(_)
        )
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let mut data = serde_json::json!({ "kind": err.kind() });
        if let ToolError::UpstreamError { status, .. } = &err {
            data["status"] = serde_json::json!(status);
        }

        if err.is_caller_error() {
            McpError::invalid_params(err.to_string(), Some(data))
        } else {
            McpError::internal_error(err.to_string(), Some(data))
        }
    }
}
