//! Scripted Provider
//!
//! A provider that replays canned responses in order. Compiled for this
//! crate's tests and, through the `mock` feature, for downstream tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::provider::LlmProvider;
use crate::types::{LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig};

/// Returns scripted responses in order and records what it was sent.
pub struct MockLlmProvider {
    /// Responses to return in sequence; each call pops the first response.
    responses: Mutex<Vec<LlmResult<LlmResponse>>>,
    /// Every call sleeps this long before answering.
    delay: Option<Duration>,
    calls: Mutex<Vec<(Option<String>, Vec<Message>)>>,
    config: ProviderConfig,
}

impl MockLlmProvider {
    pub fn new(responses: Vec<LlmResult<LlmResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            delay: None,
            calls: Mutex::new(Vec::new()),
            config: ProviderConfig {
                model: "mock-model".to_string(),
                ..Default::default()
            },
        }
    }

    pub fn with_texts(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| Ok(LlmResponse::from_text(*t, "mock-model")))
                .collect(),
        )
    }

    pub fn failing(error: LlmError, times: usize) -> Self {
        Self::new(vec![Err(error); times])
    }

    /// Answers every call with `text`, each after `delay`.
    pub fn slow(delay: Duration, text: &str) -> Self {
        Self::with_texts(&[text; 16]).with_delay(delay)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_messages(&self) -> Vec<Message> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|(_, m)| m.clone())
            .unwrap_or_default()
    }

    pub fn last_system(&self) -> Option<String> {
        self.calls.lock().unwrap().last().and_then(|(s, _)| s.clone())
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.calls.lock().unwrap().push((system, messages));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(LlmError::Other {
                message: "No more mock responses available".to_string(),
            })
        } else {
            responses.remove(0)
        }
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}
