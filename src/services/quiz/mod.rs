//! Structured Quiz
//!
//! Eight confidence categories filled by targeting the worst gap each turn.

pub mod orchestrator;
pub mod state;

pub use orchestrator::{QuizSession, QuizTurnResult};
pub use state::{FinishReason, QuizExchange, QuizQuestion, QuizState, QuizStep, MAX_SECONDARY_TARGETS};
