//! Shared helpers for integration tests.

use std::sync::Arc;

use elicit_engine::{Engine, EngineConfig};
use elicit_llm::mock::MockLlmProvider;

pub fn offline_engine() -> Engine {
    Engine::new(EngineConfig::default(), None).unwrap()
}

pub fn engine_with(provider: Arc<MockLlmProvider>) -> Engine {
    Engine::new(EngineConfig::default(), Some(provider)).unwrap()
}

pub const RICH_ANSWER: &str = "We run a small bakery with two locations downtown";
