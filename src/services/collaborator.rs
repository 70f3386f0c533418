//! Model Collaborator
//!
//! Every call to the external model goes through [`Collaborator`]. A call
//! returns `Result<T, CollaboratorError>` and is consumed only through
//! [`Collaborator::call_with_fallback`], which bounds it with a timeout and
//! substitutes a caller-supplied deterministic value on any failure.
//! Collaborator errors never leave a turn.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use elicit_llm::{LlmError, LlmProvider, LlmRequestOptions, Message};

use crate::utils::text::{build_repair_prompt, extract_json_object, truncate_chars};

/// Why a model call produced no usable value.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// No provider is configured
    #[error("no model collaborator configured")]
    Unavailable,

    /// The call did not finish within the configured bound
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    /// The provider returned an error
    #[error("model provider failed: {0}")]
    Provider(#[from] LlmError),

    /// The provider answered, but not in the expected shape
    #[error("malformed model output: {0}")]
    Malformed(String),
}

impl CollaboratorError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Whether a value came from the model or from the deterministic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Model,
    Fallback,
}

/// A value tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Enriched<T> {
    pub value: T,
    pub source: ContentSource,
}

impl<T> Enriched<T> {
    pub fn model(value: T) -> Self {
        Self {
            value,
            source: ContentSource::Model,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            source: ContentSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ContentSource::Fallback
    }
}

/// Handle to the optional model provider, shared read-only across sessions.
#[derive(Clone)]
pub struct Collaborator {
    provider: Option<Arc<dyn LlmProvider>>,
    timeout: Duration,
}

impl std::fmt::Debug for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborator")
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Collaborator {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// A collaborator with no provider; every call falls back.
    pub fn disabled() -> Self {
        Self::new(None, Duration::from_secs(1))
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn provider(&self) -> CollaboratorResult<&Arc<dyn LlmProvider>> {
        self.provider.as_ref().ok_or(CollaboratorError::Unavailable)
    }

    /// Run a model call under the timeout; on any failure return the
    /// fallback value instead.
    ///
    /// The fallback is evaluated only when needed and must be side-effect
    /// free. Dropping the returned future cancels only the model call.
    pub async fn call_with_fallback<T, Fut, F>(
        &self,
        op: &'static str,
        call: Fut,
        fallback: F,
    ) -> Enriched<T>
    where
        Fut: Future<Output = CollaboratorResult<T>>,
        F: FnOnce() -> T,
    {
        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CollaboratorError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(value) => {
                debug!(op, "Model call succeeded");
                Enriched::model(value)
            }
            Err(CollaboratorError::Unavailable) => {
                debug!(op, "No model collaborator, using fallback");
                Enriched::fallback(fallback())
            }
            Err(error) => {
                warn!(op, error = %error, "Model call failed, using fallback");
                Enriched::fallback(fallback())
            }
        }
    }

    /// Round-trip a tiny prompt to confirm the provider answers in time.
    pub async fn health_check(&self) -> CollaboratorResult<()> {
        let provider = self.provider()?;
        match tokio::time::timeout(self.timeout, provider.health_check()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CollaboratorError::Timeout(self.timeout)),
        }
    }

    /// Send one prompt and return the trimmed text response.
    pub async fn complete(
        &self,
        system: &str,
        messages: Vec<Message>,
        options: LlmRequestOptions,
    ) -> CollaboratorResult<String> {
        let provider = self.provider()?;
        let response = provider
            .send_message(messages, Some(system.to_string()), options)
            .await?;
        if response.is_truncated() {
            warn!(
                provider = provider.name(),
                output_tokens = response.usage.output_tokens,
                "Model response hit the token limit"
            );
        }
        response
            .text()
            .map(str::to_string)
            .ok_or_else(|| CollaboratorError::malformed("empty response"))
    }

    /// Send one prompt expecting a JSON object, retrying once with a repair
    /// prompt when the first response does not parse.
    pub async fn complete_json<T>(
        &self,
        system: &str,
        user_message: String,
        parse: fn(&str) -> Result<T, String>,
    ) -> CollaboratorResult<T> {
        let options = LlmRequestOptions {
            json_response: true,
            ..Default::default()
        };
        let messages = vec![Message::user(user_message)];
        let response_text = self.complete(system, messages.clone(), options.clone()).await?;

        debug!(
            len = response_text.len(),
            preview = %truncate_chars(&response_text, 200),
            "First model response"
        );

        let first_error = match parse(&extract_json_object(&response_text)) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        debug!(error = %first_error, "First response did not parse, retrying with repair prompt");

        let mut retry_messages = messages;
        retry_messages.push(Message::assistant(&response_text));
        retry_messages.push(Message::user(build_repair_prompt(&response_text, &first_error)));

        let retry_text = self.complete(system, retry_messages, options).await?;
        parse(&extract_json_object(&retry_text)).map_err(|second_error| {
            CollaboratorError::malformed(format!(
                "unparseable after retry. First error: {}. Retry error: {}",
                first_error, second_error
            ))
        })
    }
}
