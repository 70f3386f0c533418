//! Elicit Engine
//!
//! Adaptive, confidence-gated elicitation for business discovery. Tracks how
//! much is known about each topic, asks only what closes the remaining gaps,
//! and decides turn by turn whether to probe deeper or move on.
//!
//! Two session modes share one engine:
//! - a voice interview over three anchors (Problem, Process, Priority)
//! - a structured quiz over eight confidence categories
//!
//! The model collaborator is optional. Every model-backed step has a
//! deterministic fallback, so a session always progresses.

pub mod engine;
pub mod models;
pub mod services;
pub mod utils;

pub use elicit_core::{Category, ConfidenceCategory, InterviewAnchor, SignalKind};
pub use engine::Engine;
pub use models::{EngineConfig, PriorKnowledge};
pub use services::{
    ContentSource, InterviewSession, InterviewTurnResult, QuizSession, QuizStep, QuizTurnResult,
    SessionHandle,
};
pub use utils::error::{AppError, AppResult};
