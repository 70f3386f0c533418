//! Elicit LLM
//!
//! Provides a unified interface for the external model collaborator:
//! - Anthropic Claude
//! - OpenAI (and any OpenAI-compatible endpoint)
//!
//! Also includes the HTTP client factory used by both providers.

pub mod anthropic;
pub mod http_client;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod openai;
pub mod provider;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

// Re-export main types
pub use anthropic::AnthropicProvider;
pub use http_client::build_http_client;
pub use openai::OpenAIProvider;
pub use provider::LlmProvider;
pub use types::*;

/// Build a provider from its configuration.
///
/// `request_timeout` bounds the underlying HTTP requests.
pub fn create_provider(
    config: ProviderConfig,
    request_timeout: Duration,
) -> LlmResult<Arc<dyn LlmProvider>> {
    config.validate().map_err(|e| LlmError::InvalidRequest {
        message: e.to_string(),
    })?;
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderType::OpenAI => Arc::new(OpenAIProvider::new(config, request_timeout)?),
        ProviderType::Anthropic => Arc::new(AnthropicProvider::new(config, request_timeout)?),
    };
    Ok(provider)
}
