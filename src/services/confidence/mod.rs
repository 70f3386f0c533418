//! Confidence Tracking
//!
//! Scores, thresholds, facts, and gap computation shared by both session
//! modes, plus the prior-knowledge seed table used by the quiz.

pub mod seed;
pub mod tracker;

pub use tracker::{
    CategoryProgress, ConfidenceState, ExtractedFact, FactConfidence, FactSource,
    ProgressSnapshot, MAX_ANSWER_BOOST, MAX_SCORE,
};
