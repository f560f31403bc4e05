//! Outbound HTTP pipeline shared by the fetch and search tools.
//!
//! - `call.rs` - the outbound call description and its outcome
//! - `executor.rs` - sending a call under the configured timeout
//! - `reader.rs` - capped reading of response bodies

mod call;
mod executor;
mod reader;

pub use call::{CallOutcome, OutboundCall};
pub use executor::{CallExecutor, HttpExecutor};
pub use reader::{BoundedBody, read_bounded};
