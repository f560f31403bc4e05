//! Shared test helpers for tool definitions.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rmcp::model::JsonObject;

use crate::domains::tools::error::ToolError;
use crate::domains::tools::outbound::{CallExecutor, CallOutcome, OutboundCall};

/// Build an argument map from a JSON object literal.
pub fn args(value: serde_json::Value) -> JsonObject {
    value.as_object().cloned().expect("arguments must be a JSON object")
}

/// Build a success outcome.
pub fn outcome(status: u16, headers: &[(&str, &str)], body: &str) -> CallOutcome {
    CallOutcome {
        status,
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
        body: body.as_bytes().to_vec(),
        truncated: false,
    }
}

/// Executor that records calls and answers with a canned outcome.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<OutboundCall>>,
    reply: Option<CallOutcome>,
}

impl RecordingExecutor {
    pub fn replying(reply: CallOutcome) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Some(reply),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<OutboundCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CallExecutor for RecordingExecutor {
    async fn execute(&self, call: OutboundCall) -> Result<CallOutcome, ToolError> {
        self.calls.lock().unwrap().push(call);
        self.reply
            .clone()
            .ok_or_else(|| ToolError::transport("no reply configured"))
    }
}
