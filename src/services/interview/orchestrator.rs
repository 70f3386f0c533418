//! Interview Orchestrator
//!
//! Drives one voice interview turn by turn: detect signals, commit the
//! state transition, then enrich the acknowledgment. The transition is
//! committed before the only await, so a cancelled or slow model call can
//! never undo or stall it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use elicit_core::InterviewAnchor;

use super::state::{InterviewPhase, InterviewState, QuestionType};
use crate::models::EngineConfig;
use crate::services::collaborator::{ContentSource, Enriched};
use crate::services::confidence::ProgressSnapshot;
use crate::services::generator::{template_acknowledgment, Generator, LastExchange};
use crate::services::guardrail::sanitize_answer;
use crate::services::signals::SignalDetector;
use crate::utils::error::{AppError, AppResult};

/// Progress report for an interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewProgress {
    pub current_anchor: u8,
    pub phase: InterviewPhase,
    pub follow_ups_for_current_anchor: u32,
    pub questions_asked: u32,
    pub max_total_questions: u32,
    pub percent: u32,
    pub confidence: ProgressSnapshot<InterviewAnchor>,
}

/// Result of one processed answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewTurnResult {
    pub acknowledgment: String,
    pub acknowledgment_source: ContentSource,
    pub next_question: String,
    pub next_question_type: QuestionType,
    /// Anchor the next question belongs to
    pub anchor: u8,
    pub signals_detected: Vec<String>,
    pub should_probe_deeper: bool,
    pub progress: InterviewProgress,
    pub interview_complete: bool,
}

/// One voice interview. Owns its state exclusively.
pub struct InterviewSession {
    state: InterviewState,
    config: Arc<EngineConfig>,
    detector: Arc<SignalDetector>,
    generator: Generator,
}

impl InterviewSession {
    pub(crate) fn new(
        state: InterviewState,
        config: Arc<EngineConfig>,
        detector: Arc<SignalDetector>,
        generator: Generator,
    ) -> Self {
        Self {
            state,
            config,
            detector,
            generator,
        }
    }

    pub fn id(&self) -> &str {
        &self.state.id
    }

    pub fn state(&self) -> &InterviewState {
        &self.state
    }

    /// Give up the session and keep its state for persistence.
    pub fn into_state(self) -> InterviewState {
        self.state
    }

    /// The anchor-1 prompt that opens every interview.
    pub fn opening_question(&self) -> &str {
        self.config.interview.prompts.for_anchor(InterviewAnchor::Problem)
    }

    /// The question currently awaiting an answer.
    pub fn current_question(&self) -> &str {
        self.state.current_question()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn progress(&self) -> InterviewProgress {
        InterviewProgress {
            current_anchor: self.state.current_anchor().number(),
            phase: self.state.phase(),
            follow_ups_for_current_anchor: self.state.follow_ups_for_current_anchor(),
            questions_asked: self.state.questions_asked(),
            max_total_questions: self.state.max_total_questions(),
            percent: self.state.percent(),
            confidence: self.state.confidence().snapshot(),
        }
    }

    /// Process one answer.
    pub async fn submit_answer(&mut self, answer: &str) -> AppResult<InterviewTurnResult> {
        if self.state.is_complete() {
            return Err(AppError::validation(format!(
                "interview {} is already complete",
                self.state.id
            )));
        }

        let detection = self.detector.detect(answer);
        let sanitized = sanitize_answer(answer, self.config.collaborator.max_answer_chars);
        let asked = self.state.current_question().to_string();

        let transition = self
            .state
            .apply(&sanitized.text, &detection, &self.config.interview);

        if self.state.is_complete() {
            info!(
                interview_id = %self.state.id,
                reason = ?self.state.completion(),
                questions_asked = self.state.questions_asked(),
                "Interview complete"
            );
        }

        let acknowledgment = if transition.answered_phase == InterviewPhase::Anchor {
            self.generator
                .acknowledge(
                    LastExchange {
                        question: &asked,
                        answer: &sanitized,
                    },
                    &detection,
                )
                .await
        } else {
            Enriched::fallback(template_acknowledgment(&detection).to_string())
        };

        Ok(InterviewTurnResult {
            acknowledgment: acknowledgment.value,
            acknowledgment_source: acknowledgment.source,
            next_question: transition.next_question,
            next_question_type: transition.next_question_type,
            anchor: self.state.current_anchor().number(),
            signals_detected: detection.names(),
            should_probe_deeper: detection.should_probe_deeper,
            progress: self.progress(),
            interview_complete: self.state.is_complete(),
        })
    }
}
