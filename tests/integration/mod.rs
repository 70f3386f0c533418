//! Integration Tests Module
//!
//! End-to-end tests through the public engine API. Model-backed paths use
//! `elicit_llm::mock::MockLlmProvider`; everything else runs on the
//! deterministic fallback path.

mod common;

// Confidence tracker scenarios (gap ordering, batch readiness)
mod confidence_test;

// Signal detector behavior on the built-in bank
mod signals_test;

// Configuration loading from disk
mod config_test;

// Voice interview flow
mod interview_test;

// Structured quiz flow
mod quiz_test;

// Turn serialization per session
mod session_test;

// Dropped turns leave consistent state
mod cancellation_test;

// Property tests over the state machines
mod property_test;
