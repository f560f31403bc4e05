//! Call executor.
//!
//! Sends an [`OutboundCall`] and turns whatever happens into either a
//! [`CallOutcome`] or a classified [`ToolError`]. There are no retries: the
//! first failure is the answer.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

use super::call::{CallOutcome, OutboundCall, first_values};
use super::reader::read_bounded;
use crate::core::config::HttpClientConfig;
use crate::domains::tools::error::ToolError;

/// Executes outbound calls.
///
/// Tools depend on this trait rather than on `reqwest` directly so the
/// network can be replaced in tests.
#[async_trait]
pub trait CallExecutor: Send + Sync {
    async fn execute(&self, call: OutboundCall) -> Result<CallOutcome, ToolError>;
}

/// `reqwest`-backed executor with a fixed timeout, user agent and body cap.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    max_body_size: usize,
}

impl HttpExecutor {
    /// Build the executor. The timeout covers the whole exchange, body included.
    pub fn new(config: &HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_body_size: config.max_body_size,
        })
    }
}

#[async_trait]
impl CallExecutor for HttpExecutor {
    async fn execute(&self, call: OutboundCall) -> Result<CallOutcome, ToolError> {
        info!("Sending {} request to {}", call.method, call.url.host_str().unwrap_or(""));

        let mut request = self
            .client
            .request(call.method, call.url)
            .headers(call.headers);
        if let Some(body) = call.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("Request failed: {}", e);
            classify(e)
        })?;

        let status = response.status();
        let headers = first_values(response.headers());

        let body = read_bounded(Box::pin(response.bytes_stream()), self.max_body_size)
            .await
            .map_err(|e| {
                error!("Failed to read response body: {}", e);
                if e.is_timeout() {
                    ToolError::timeout(e.to_string())
                } else {
                    ToolError::read_failure(e.to_string())
                }
            })?;

        if body.truncated {
            debug!("Response body truncated at {} bytes", self.max_body_size);
        }

        if !status.is_success() {
            error!("Upstream returned status code {}", status.as_u16());
            return Err(ToolError::upstream(status.as_u16(), &body.bytes));
        }

        Ok(CallOutcome {
            status: status.as_u16(),
            headers,
            body: body.bytes,
            truncated: body.truncated,
        })
    }
}

fn classify(e: reqwest::Error) -> ToolError {
    if e.is_timeout() {
        ToolError::timeout(e.to_string())
    } else if e.is_builder() {
        ToolError::invalid_parameters(format!("failed to create request: {e}"))
    } else {
        ToolError::transport(e.to_string())
    }
}
