//! Answer Analyzer
//!
//! Turns a raw quiz answer into an [`AnswerAnalysis`]. The model path runs
//! when a collaborator is configured; the deterministic path built from the
//! signal detection replaces it on any failure.

pub mod fallback;
pub mod llm_analyzer;
pub mod types;

pub use llm_analyzer::analyze_answer;
pub use types::{AnalyzedFact, AnswerAnalysis, Sentiment};

use elicit_core::ConfidenceCategory;

use crate::services::collaborator::{Collaborator, Enriched};
use crate::services::guardrail::SanitizedAnswer;
use crate::services::signals::SignalDetection;

/// Analyze an answer, falling back to the detection-derived analysis.
pub async fn analyze_with_fallback(
    collaborator: &Collaborator,
    question: &str,
    answer: &SanitizedAnswer,
    detection: &SignalDetection,
    primary: ConfidenceCategory,
    secondary: &[ConfidenceCategory],
) -> Enriched<AnswerAnalysis> {
    let mut targets = vec![primary];
    targets.extend_from_slice(secondary);

    collaborator
        .call_with_fallback(
            "analyze_answer",
            analyze_answer(collaborator, question, answer, &targets),
            || AnswerAnalysis::from_detection(detection, &answer.text, primary, secondary),
        )
        .await
}
