//! Parameter binding.
//!
//! Tool arguments arrive as an untyped JSON object. Each tool declares a
//! parameter struct with `#[serde(deny_unknown_fields)]`; binding re-marshals
//! the object and decodes it strictly, so unknown or missing fields are
//! rejected with the field name in the message.

use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::ToolError;

/// Decode an argument map into the tool's parameter struct.
pub fn bind<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, ToolError> {
    serde_json::from_value(serde_json::Value::Object(arguments)).map_err(|e| {
        warn!("Invalid parameters: {}", e);
        ToolError::invalid_parameters(e.to_string())
    })
}

/// Truncate a protocol number toward zero.
///
/// The host encodes every number as a float; integer semantics are recovered
/// by dropping the fraction, never by rounding.
pub fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

/// Treat an empty string the same as an absent one.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
