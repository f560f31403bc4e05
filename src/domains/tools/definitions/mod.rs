//! Tool definitions module.
//!
//! One file per exposed tool. `fetch` and `search` go through the outbound
//! pipeline; `api_status` and `time` never touch the network.

pub mod api_status;
pub mod fetch;
pub mod search;
pub mod time;

#[cfg(test)]
pub mod testing;

pub use api_status::ApiStatusTool;
pub use fetch::{FetchUrlParams, FetchUrlTool};
pub use search::{SearchGoogleParams, SearchGoogleTool};
pub use time::{GetCurrentTimeParams, GetCurrentTimeTool};
