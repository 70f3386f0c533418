//! Acknowledgment and Question Generator
//!
//! Model-backed text with a deterministic template behind every call.

pub mod llm_generator;
pub mod templates;

pub use llm_generator::{LastExchange, QuizTurnText, MAX_ACKNOWLEDGMENT_CHARS};
pub use templates::{
    acknowledgment_for, category_question, fallback_question, template_acknowledgment,
};

use elicit_core::ConfidenceCategory;

use crate::services::collaborator::{Collaborator, Enriched};
use crate::services::signals::SignalDetection;

/// Generates acknowledgments and questions for one engine.
#[derive(Debug, Clone)]
pub struct Generator {
    collaborator: Collaborator,
}

impl Generator {
    pub fn new(collaborator: Collaborator) -> Self {
        Self { collaborator }
    }

    pub fn collaborator(&self) -> &Collaborator {
        &self.collaborator
    }

    /// Acknowledge an answer, falling back to the template for the dominant
    /// signal.
    pub async fn acknowledge(
        &self,
        exchange: LastExchange<'_>,
        detection: &SignalDetection,
    ) -> Enriched<String> {
        self.collaborator
            .call_with_fallback(
                "acknowledge",
                llm_generator::acknowledge(&self.collaborator, exchange),
                || template_acknowledgment(detection).to_string(),
            )
            .await
    }

    /// Produce the next quiz question and, when `last` is set, an
    /// acknowledgment of the previous answer.
    pub async fn quiz_turn(
        &self,
        target: ConfidenceCategory,
        secondary: &[ConfidenceCategory],
        deep_dive_topic: Option<&str>,
        last: Option<(LastExchange<'_>, &SignalDetection)>,
    ) -> Enriched<QuizTurnText> {
        let exchange = last.map(|(exchange, _)| exchange);
        let template = || {
            last.map(|(_, detection)| template_acknowledgment(detection).to_string())
                .unwrap_or_default()
        };
        let mut turn = self
            .collaborator
            .call_with_fallback(
                "quiz_turn",
                llm_generator::quiz_turn(
                    &self.collaborator,
                    target,
                    secondary,
                    deep_dive_topic,
                    exchange,
                ),
                || QuizTurnText {
                    acknowledgment: template(),
                    question: fallback_question(target, secondary, deep_dive_topic),
                },
            )
            .await;
        // A previous answer always gets acknowledged, even when the model
        // wrote a question but left the acknowledgment blank.
        if turn.value.acknowledgment.is_empty() {
            turn.value.acknowledgment = template();
        }
        turn
    }
}
