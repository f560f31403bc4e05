//! Outbound call description and its outcome.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};

use crate::domains::tools::error::ToolError;

/// A fully specified HTTP request, ready to execute.
///
/// Built by a pure request builder; nothing here performs I/O.
#[derive(Debug, Clone)]
pub struct OutboundCall {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl OutboundCall {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set a header, replacing any earlier value for the same name.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), ToolError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ToolError::invalid_parameters(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value).map_err(|_| {
            ToolError::invalid_parameters(format!("invalid value for header {name}"))
        })?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Current value of a header, if set and printable.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The result of a completed exchange with a success status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub status: u16,
    /// First value of each response header, keyed by lowercase name.
    pub headers: BTreeMap<String, String>,
    /// Body bytes, capped at the server's maximum body size.
    pub body: Vec<u8>,
    pub truncated: bool,
}

impl CallOutcome {
    /// Body as text; invalid UTF-8 sequences are replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Collapse a header map to its first value per name.
pub(crate) fn first_values(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (name, value) in headers {
        map.entry(name.as_str().to_string())
            .or_insert_with(|| String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    map
}
