//! Quiz State
//!
//! Gap-driven selection and answer application. No awaits here; the
//! orchestrator calls the model around these pure steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use elicit_core::{Category, ConfidenceCategory, SignalKind};

use crate::models::{PriorKnowledge, QuizConfig};
use crate::services::analyzer::{AnswerAnalysis, Sentiment};
use crate::services::collaborator::ContentSource;
use crate::services::confidence::{ConfidenceState, ExtractedFact, FactSource, ProgressSnapshot};

/// Secondary categories a question may also address.
pub const MAX_SECONDARY_TARGETS: usize = 2;

/// Why the quiz stopped asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Every category reached its threshold
    Ready,
    /// `max_questions` reached with gaps remaining
    QuestionLimit,
}

/// A question targeting the worst gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    pub target: ConfidenceCategory,
    pub secondary: Vec<ConfidenceCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_dive_topic: Option<String>,
    pub source: ContentSource,
}

impl QuizQuestion {
    /// Primary plus secondary targets.
    pub fn targets(&self) -> Vec<ConfidenceCategory> {
        let mut targets = vec![self.target];
        targets.extend(self.secondary.iter().copied());
        targets
    }
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizStep {
    Question(QuizQuestion),
    Finished {
        reason: FinishReason,
        snapshot: ProgressSnapshot<ConfidenceCategory>,
    },
}

impl QuizStep {
    pub fn question(&self) -> Option<&QuizQuestion> {
        match self {
            QuizStep::Question(q) => Some(q),
            QuizStep::Finished { .. } => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, QuizStep::Finished { .. })
    }
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizExchange {
    pub question_id: String,
    pub question: String,
    pub target: ConfidenceCategory,
    /// Sanitized answer text
    pub answer: String,
    pub signals: Vec<SignalKind>,
    pub sentiment: Sentiment,
    pub analysis_source: ContentSource,
    pub answered_at: DateTime<Utc>,
}

/// Persistable state of one quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizState {
    pub id: String,
    confidence: ConfidenceState<ConfidenceCategory>,
    max_questions: u32,
    pending: Option<QuizQuestion>,
    history: Vec<QuizExchange>,
    deep_dive_topic: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizState {
    pub fn new(config: &QuizConfig) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            confidence: ConfidenceState::new(config.thresholds.clone()),
            max_questions: config.max_questions,
            pending: None,
            history: Vec::new(),
            deep_dive_topic: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// New quiz seeded from prior research.
    pub fn with_prior_knowledge(config: &QuizConfig, prior: &PriorKnowledge) -> Self {
        let mut state = Self::new(config);
        state.confidence.initialize_from_prior_knowledge(prior);
        state
    }

    pub fn confidence(&self) -> &ConfidenceState<ConfidenceCategory> {
        &self.confidence
    }

    pub fn pending(&self) -> Option<&QuizQuestion> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &[QuizExchange] {
        &self.history
    }

    pub fn max_questions(&self) -> u32 {
        self.max_questions
    }

    pub fn questions_asked(&self) -> u32 {
        self.confidence.questions_asked()
    }

    pub fn is_ready(&self) -> bool {
        self.confidence.is_ready()
    }

    /// `Some` once no further question should be asked.
    pub fn finish_reason(&self) -> Option<FinishReason> {
        if self.confidence.is_ready() {
            Some(FinishReason::Ready)
        } else if self.questions_asked() >= self.max_questions {
            Some(FinishReason::QuestionLimit)
        } else {
            None
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finish_reason().is_some()
    }

    /// Worst gap plus up to [`MAX_SECONDARY_TARGETS`] next-worst gaps.
    pub fn next_targets(&self) -> Option<(ConfidenceCategory, Vec<ConfidenceCategory>)> {
        let gaps = self.confidence.sorted_gaps();
        let (target, rest) = gaps.split_first()?;
        Some((*target, rest.iter().take(MAX_SECONDARY_TARGETS).copied().collect()))
    }

    /// Build the next question with the given text, without storing it.
    pub fn plan_question(
        &self,
        text: impl FnOnce(ConfidenceCategory, &[ConfidenceCategory], Option<&str>) -> String,
    ) -> Option<QuizQuestion> {
        if self.is_finished() {
            return None;
        }
        let (target, secondary) = self.next_targets()?;
        let deep_dive_topic = self.deep_dive_topic.clone();
        Some(QuizQuestion {
            id: format!("q{}", self.questions_asked() + 1),
            text: text(target, &secondary, deep_dive_topic.as_deref()),
            target,
            secondary,
            deep_dive_topic,
            source: ContentSource::Fallback,
        })
    }

    /// Store a question as the one awaiting an answer.
    pub fn set_pending(&mut self, question: QuizQuestion) {
        self.pending = Some(question);
        self.updated_at = Utc::now();
    }

    /// Replace the pending question's text with model-generated text.
    pub fn enrich_pending(&mut self, question_id: &str, text: String) {
        if let Some(pending) = self.pending.as_mut().filter(|p| p.id == question_id) {
            pending.text = text;
            pending.source = ContentSource::Model;
        }
    }

    /// Apply an analysis to the pending question. Boosts land only on the
    /// question's targets; facts land on the category they name.
    pub fn apply_answer(
        &mut self,
        question: &QuizQuestion,
        answer_text: &str,
        analysis: &AnswerAnalysis,
        analysis_source: ContentSource,
    ) {
        for category in question.targets() {
            let boost = analysis.boost_for(category);
            if boost > 0 {
                self.confidence.apply_boost(category, boost);
            }
        }
        for fact in &analysis.extracted_facts {
            self.confidence.add_fact(
                fact.category,
                ExtractedFact::new(
                    fact.label.clone(),
                    fact.value.clone(),
                    fact.confidence,
                    FactSource::AnswerExtraction,
                ),
            );
        }
        self.confidence.record_question();

        self.deep_dive_topic = if analysis.should_deep_dive {
            analysis.deep_dive_topic.clone()
        } else {
            None
        };
        self.history.push(QuizExchange {
            question_id: question.id.clone(),
            question: question.text.clone(),
            target: question.target,
            answer: answer_text.to_string(),
            signals: analysis.detected_signals.clone(),
            sentiment: analysis.sentiment,
            analysis_source,
            answered_at: Utc::now(),
        });
        self.pending = None;
        self.updated_at = Utc::now();

        debug!(
            quiz_id = %self.id,
            target = question.target.as_str(),
            gaps = self.confidence.gaps().len(),
            questions_asked = self.questions_asked(),
            "Quiz answer applied"
        );
    }

    pub fn snapshot(&self) -> ProgressSnapshot<ConfidenceCategory> {
        self.confidence.snapshot()
    }
}
