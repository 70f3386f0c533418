//! Quiz Orchestrator
//!
//! Gap-driven loop: ask about the worst gap, analyze the answer, apply the
//! boosts, repeat until every category reaches its threshold or the
//! question ceiling is hit.
//!
//! The analyzer await happens before any mutation, so dropping a turn
//! mid-analysis leaves the state untouched. The next question is stored
//! with its template text before the generator await, so dropping a turn
//! after that point still leaves a usable pending question.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use elicit_core::ConfidenceCategory;

use super::state::{FinishReason, QuizQuestion, QuizState, QuizStep};
use crate::models::EngineConfig;
use crate::services::analyzer::{analyze_with_fallback, Sentiment};
use crate::services::collaborator::ContentSource;
use crate::services::confidence::ProgressSnapshot;
use crate::services::generator::{
    fallback_question, template_acknowledgment, Generator, LastExchange,
};
use crate::services::guardrail::sanitize_answer;
use crate::services::signals::{SignalDetection, SignalDetector};
use crate::utils::error::{AppError, AppResult};

/// Result of one answered quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizTurnResult {
    pub acknowledgment: String,
    pub signals_detected: Vec<String>,
    pub sentiment: Sentiment,
    pub analysis_source: ContentSource,
    pub next: QuizStep,
    pub progress: ProgressSnapshot<ConfidenceCategory>,
    /// True gap state, independent of the question ceiling
    pub ready: bool,
}

/// One structured quiz. Owns its state exclusively.
pub struct QuizSession {
    state: QuizState,
    config: Arc<EngineConfig>,
    detector: Arc<SignalDetector>,
    generator: Generator,
}

impl QuizSession {
    pub(crate) fn new(
        state: QuizState,
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

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn into_state(self) -> QuizState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    pub fn progress(&self) -> ProgressSnapshot<ConfidenceCategory> {
        self.state.snapshot()
    }

    fn finished_step(&self) -> Option<QuizStep> {
        self.state.finish_reason().map(|reason| QuizStep::Finished {
            reason,
            snapshot: self.state.snapshot(),
        })
    }

    /// No gap left to target means every category is at threshold.
    fn no_targets_step(&self) -> QuizStep {
        self.finished_step().unwrap_or_else(|| QuizStep::Finished {
            reason: FinishReason::Ready,
            snapshot: self.state.snapshot(),
        })
    }

    /// The question awaiting an answer, asking a new one if none is pending.
    pub async fn next_question(&mut self) -> QuizStep {
        if let Some(pending) = self.state.pending() {
            return QuizStep::Question(pending.clone());
        }
        if let Some(finished) = self.finished_step() {
            return finished;
        }
        match self.ask_next(None).await {
            Some((question, _)) => QuizStep::Question(question),
            None => self.no_targets_step(),
        }
    }

    /// Answer the pending question.
    pub async fn submit_answer(&mut self, answer: &str) -> AppResult<QuizTurnResult> {
        let question = self.state.pending().cloned().ok_or_else(|| {
            if self.state.is_finished() {
                AppError::validation(format!("quiz {} is already finished", self.state.id))
            } else {
                AppError::validation(format!("quiz {} has no pending question", self.state.id))
            }
        })?;

        let detection = self.detector.detect(answer);
        let sanitized = sanitize_answer(answer, self.config.collaborator.max_answer_chars);

        let analysis = analyze_with_fallback(
            self.generator.collaborator(),
            &question.text,
            &sanitized,
            &detection,
            question.target,
            &question.secondary,
        )
        .await;

        self.state
            .apply_answer(&question, &sanitized.text, &analysis.value, analysis.source);

        let exchange = LastExchange {
            question: &question.text,
            answer: &sanitized,
        };
        let (next, acknowledgment) = match self.finished_step() {
            Some(finished) => {
                info!(
                    quiz_id = %self.state.id,
                    reason = ?self.state.finish_reason(),
                    questions_asked = self.state.questions_asked(),
                    "Quiz finished"
                );
                let ack = self.generator.acknowledge(exchange, &detection).await;
                (finished, ack.value)
            }
            None => match self.ask_next(Some((exchange, &detection))).await {
                Some((question, ack)) => (QuizStep::Question(question), ack),
                None => (
                    self.no_targets_step(),
                    template_acknowledgment(&detection).to_string(),
                ),
            },
        };

        Ok(QuizTurnResult {
            acknowledgment,
            signals_detected: analysis.value.signal_names(),
            sentiment: analysis.value.sentiment,
            analysis_source: analysis.source,
            next,
            progress: self.state.snapshot(),
            ready: self.state.is_ready(),
        })
    }

    /// Plan, store, and enrich the next question. Returns the question and
    /// the acknowledgment of `last` (empty when `last` is `None`).
    async fn ask_next(
        &mut self,
        last: Option<(LastExchange<'_>, &SignalDetection)>,
    ) -> Option<(QuizQuestion, String)> {
        let planned = self.state.plan_question(fallback_question)?;
        self.state.set_pending(planned.clone());

        let turn = self
            .generator
            .quiz_turn(
                planned.target,
                &planned.secondary,
                planned.deep_dive_topic.as_deref(),
                last,
            )
            .await;

        if turn.source == ContentSource::Model {
            self.state.enrich_pending(&planned.id, turn.value.question);
        }
        let question = self.state.pending().cloned().unwrap_or(planned);
        Some((question, turn.value.acknowledgment))
    }
}
