//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients with bounded
//! connect and request timeouts.

use std::time::Duration;

use crate::types::{LlmError, LlmResult};

/// Connect timeout applied to every provider client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build a `reqwest::Client` whose requests never outlive `request_timeout`.
///
/// The engine wraps every call in its own timeout as well; this one keeps
/// sockets from lingering after the engine has already fallen back.
pub fn build_http_client(request_timeout: Duration) -> LlmResult<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT.min(request_timeout))
        .timeout(request_timeout)
        .build()
        .map_err(|e| LlmError::Other {
            message: format!("failed to build HTTP client: {}", e),
        })
}
