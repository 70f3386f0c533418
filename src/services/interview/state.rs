//! Interview State
//!
//! The three-anchor state machine. All decisions are pure functions of the
//! state and the signal detection; nothing here awaits.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use elicit_core::{Category, InterviewAnchor, SignalKind};

use crate::models::InterviewConfig;
use crate::services::confidence::{
    ConfidenceState, ExtractedFact, FactConfidence, FactSource, MAX_ANSWER_BOOST,
};
use crate::services::signals::SignalDetection;
use crate::utils::text::truncate_chars;

pub const ANCHOR_ANSWER_BOOST: u32 = 40;
pub const FOLLOW_UP_ANSWER_BOOST: u32 = 25;
pub const VAGUE_ANSWER_BOOST: u32 = 10;
pub const SIGNAL_BONUS: u32 = 5;
const FACT_VALUE_MAX_CHARS: usize = 280;

/// Whether the current question is the anchor prompt or a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    Anchor,
    FollowUp,
}

/// Kind of the question returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Anchor,
    FollowUp,
    Summary,
}

/// Why the interview ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// `max_total_questions` reached
    QuestionLimit,
    /// The priority anchor was answered
    FinalAnchor,
    /// Probing ended on the last anchor
    AnchorsExhausted,
}

/// One processed answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub anchor: InterviewAnchor,
    pub phase: InterviewPhase,
    pub question: String,
    /// Sanitized answer text
    pub text: String,
    pub signals: Vec<SignalKind>,
    pub word_count: usize,
    pub answered_at: DateTime<Utc>,
}

/// What the state machine decided for one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterviewDecision {
    Complete(CompletionReason),
    FollowUp(String),
    Advance(InterviewAnchor),
}

/// Outcome of applying one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub answered_anchor: InterviewAnchor,
    pub answered_phase: InterviewPhase,
    pub decision: InterviewDecision,
    pub next_question: String,
    pub next_question_type: QuestionType,
}

/// Persistable state of one voice interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewState {
    pub id: String,
    current_anchor: InterviewAnchor,
    phase: InterviewPhase,
    follow_ups_for_current_anchor: u32,
    /// The question awaiting an answer
    current_question: String,
    answers: Vec<RecordedAnswer>,
    /// Multiset of every signal seen
    signals_seen: BTreeMap<SignalKind, u32>,
    max_follow_ups_per_anchor: u32,
    max_total_questions: u32,
    completion: Option<CompletionReason>,
    confidence: ConfidenceState<InterviewAnchor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewState {
    /// Fresh state on anchor 1.
    pub fn new(config: &InterviewConfig) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            current_anchor: InterviewAnchor::Problem,
            phase: InterviewPhase::Anchor,
            follow_ups_for_current_anchor: 0,
            current_question: config.prompts.for_anchor(InterviewAnchor::Problem).to_string(),
            answers: Vec::new(),
            signals_seen: BTreeMap::new(),
            max_follow_ups_per_anchor: config.max_follow_ups_per_anchor,
            max_total_questions: config.max_total_questions,
            completion: None,
            confidence: ConfidenceState::new(config.anchor_thresholds()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn current_anchor(&self) -> InterviewAnchor {
        self.current_anchor
    }

    pub fn phase(&self) -> InterviewPhase {
        self.phase
    }

    pub fn follow_ups_for_current_anchor(&self) -> u32 {
        self.follow_ups_for_current_anchor
    }

    pub fn current_question(&self) -> &str {
        &self.current_question
    }

    pub fn answers(&self) -> &[RecordedAnswer] {
        &self.answers
    }

    pub fn signals_seen(&self) -> &BTreeMap<SignalKind, u32> {
        &self.signals_seen
    }

    pub fn questions_asked(&self) -> u32 {
        self.confidence.questions_asked()
    }

    pub fn max_total_questions(&self) -> u32 {
        self.max_total_questions
    }

    pub fn confidence(&self) -> &ConfidenceState<InterviewAnchor> {
        &self.confidence
    }

    pub fn completion(&self) -> Option<CompletionReason> {
        self.completion
    }

    pub fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    /// Rough progress through the anchors.
    pub fn percent(&self) -> u32 {
        if self.is_complete() {
            return 100;
        }
        let anchors = InterviewAnchor::all().len() as u32;
        (self.current_anchor.number() as u32 - 1) * 100 / anchors
    }

    /// Decide what follows the answer just recorded. Checks run in order and
    /// the first match wins: hard ceiling, final anchor, probe, advance.
    pub fn decide(&self, detection: &SignalDetection) -> InterviewDecision {
        if self.questions_asked() >= self.max_total_questions {
            return InterviewDecision::Complete(CompletionReason::QuestionLimit);
        }
        if self.current_anchor.is_last() && self.phase == InterviewPhase::Anchor {
            return InterviewDecision::Complete(CompletionReason::FinalAnchor);
        }
        if detection.should_probe_deeper
            && self.follow_ups_for_current_anchor < self.max_follow_ups_per_anchor
        {
            if let Some(prompt) = detection.suggested_follow_ups.first() {
                return InterviewDecision::FollowUp(prompt.clone());
            }
        }
        match self.current_anchor.next() {
            Some(anchor) => InterviewDecision::Advance(anchor),
            None => InterviewDecision::Complete(CompletionReason::AnchorsExhausted),
        }
    }

    /// Record one answer and commit the resulting transition.
    ///
    /// `text` is the sanitized answer; `detection` comes from the raw one.
    pub fn apply(
        &mut self,
        text: &str,
        detection: &SignalDetection,
        config: &InterviewConfig,
    ) -> Transition {
        let answered_anchor = self.current_anchor;
        let answered_phase = self.phase;

        self.record_answer(text, detection);
        let decision = self.decide(detection);

        let (next_question, next_question_type) = match &decision {
            InterviewDecision::Complete(reason) => {
                self.completion = Some(*reason);
                (config.prompts.wrap_up.clone(), QuestionType::Summary)
            }
            InterviewDecision::FollowUp(prompt) => {
                self.phase = InterviewPhase::FollowUp;
                self.follow_ups_for_current_anchor += 1;
                (prompt.clone(), QuestionType::FollowUp)
            }
            InterviewDecision::Advance(anchor) => {
                self.current_anchor = *anchor;
                self.phase = InterviewPhase::Anchor;
                self.follow_ups_for_current_anchor = 0;
                (config.prompts.for_anchor(*anchor).to_string(), QuestionType::Anchor)
            }
        };

        self.current_question = next_question.clone();
        self.updated_at = Utc::now();

        debug!(
            interview_id = %self.id,
            answered_anchor = answered_anchor.number(),
            decision = ?decision,
            questions_asked = self.questions_asked(),
            "Interview transition"
        );

        Transition {
            answered_anchor,
            answered_phase,
            decision,
            next_question,
            next_question_type,
        }
    }

    fn record_answer(&mut self, text: &str, detection: &SignalDetection) {
        let anchor = self.current_anchor;

        let base = if detection.is_vague() {
            VAGUE_ANSWER_BOOST
        } else if self.phase == InterviewPhase::Anchor {
            ANCHOR_ANSWER_BOOST
        } else {
            FOLLOW_UP_ANSWER_BOOST
        };
        let boost = (base + SIGNAL_BONUS * detection.content_signal_count() as u32)
            .min(MAX_ANSWER_BOOST);
        self.confidence.apply_boost(anchor, boost);

        let value = truncate_chars(text.trim(), FACT_VALUE_MAX_CHARS);
        if !value.is_empty() {
            let level = if detection.is_vague() {
                FactConfidence::Low
            } else if detection.signals.len() >= 2 {
                FactConfidence::High
            } else {
                FactConfidence::Medium
            };
            self.confidence.add_fact(
                anchor,
                ExtractedFact::new(anchor.label(), value, level, FactSource::AnswerExtraction),
            );
        }

        for kind in detection.kinds() {
            *self.signals_seen.entry(kind).or_insert(0) += 1;
        }
        self.confidence.record_question();

        self.answers.push(RecordedAnswer {
            anchor,
            phase: self.phase,
            question: self.current_question.clone(),
            text: text.to_string(),
            signals: detection.kinds(),
            word_count: detection.word_count,
            answered_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_signal_bank;
    use crate::services::signals::SignalDetector;

    fn setup() -> (InterviewState, InterviewConfig, SignalDetector) {
        let config = InterviewConfig::default();
        (
            InterviewState::new(&config),
            config,
            SignalDetector::new(&default_signal_bank()),
        )
    }

    fn answer(
        state: &mut InterviewState,
        config: &InterviewConfig,
        detector: &SignalDetector,
        text: &str,
    ) -> Transition {
        state.apply(text, &detector.detect(text), config)
    }

    #[test]
    fn test_new_state_starts_on_problem_anchor() {
        let (state, config, _) = setup();
        assert_eq!(state.current_anchor(), InterviewAnchor::Problem);
        assert_eq!(state.phase(), InterviewPhase::Anchor);
        assert_eq!(state.current_question(), config.prompts.problem);
        assert_eq!(state.questions_asked(), 0);
        assert_eq!(state.percent(), 0);
        assert!(!state.is_complete());
    }

    #[test]
    fn test_vague_answer_triggers_follow_up() {
        let (mut state, config, detector) = setup();
        let transition = answer(&mut state, &config, &detector, "ok");
        assert_eq!(transition.next_question_type, QuestionType::FollowUp);
        assert_eq!(state.phase(), InterviewPhase::FollowUp);
        assert_eq!(state.follow_ups_for_current_anchor(), 1);
        assert_eq!(
            transition.next_question,
            detector.follow_ups_for(SignalKind::VagueAnswer)[0]
        );
    }

    #[test]
    fn test_follow_ups_are_bounded_per_anchor() {
        let (mut state, config, detector) = setup();
        let types: Vec<QuestionType> = (0..3)
            .map(|_| answer(&mut state, &config, &detector, "ok").next_question_type)
            .collect();
        assert_eq!(
            types,
            vec![QuestionType::FollowUp, QuestionType::FollowUp, QuestionType::Anchor]
        );
        assert_eq!(state.current_anchor(), InterviewAnchor::Process);
        assert_eq!(state.follow_ups_for_current_anchor(), 0);
    }

    #[test]
    fn test_rich_answer_advances() {
        let (mut state, config, detector) = setup();
        let transition = answer(
            &mut state,
            &config,
            &detector,
            "We run a small bakery with two locations downtown",
        );
        assert_eq!(transition.decision, InterviewDecision::Advance(InterviewAnchor::Process));
        assert_eq!(transition.next_question, config.prompts.process);
        assert_eq!(state.percent(), 33);
    }

    #[test]
    fn test_signal_rich_answer_advances_without_probe() {
        let (mut state, config, detector) = setup();
        let transition = answer(
            &mut state,
            &config,
            &detector,
            "We retype every order by hand and it is a nightmare",
        );
        assert_eq!(transition.next_question_type, QuestionType::Anchor);
        assert_eq!(state.confidence().score(InterviewAnchor::Problem), MAX_ANSWER_BOOST);
    }

    #[test]
    fn test_priority_anchor_answer_completes() {
        let (mut state, config, detector) = setup();
        let rich = "We run a small bakery with two locations downtown";
        answer(&mut state, &config, &detector, rich);
        answer(&mut state, &config, &detector, rich);
        // Even a vague priority answer ends the interview
        let transition = answer(&mut state, &config, &detector, "ok");
        assert_eq!(
            transition.decision,
            InterviewDecision::Complete(CompletionReason::FinalAnchor)
        );
        assert_eq!(transition.next_question, config.prompts.wrap_up);
        assert_eq!(transition.next_question_type, QuestionType::Summary);
        assert!(state.is_complete());
        assert_eq!(state.percent(), 100);
    }

    #[test]
    fn test_question_ceiling_wins_over_probing() {
        let config = InterviewConfig {
            max_total_questions: 2,
            ..Default::default()
        };
        let detector = SignalDetector::new(&default_signal_bank());
        let mut state = InterviewState::new(&config);
        answer(&mut state, &config, &detector, "ok");
        let transition = answer(&mut state, &config, &detector, "ok");
        assert_eq!(
            transition.decision,
            InterviewDecision::Complete(CompletionReason::QuestionLimit)
        );
    }

    #[test]
    fn test_zero_follow_ups_always_advances() {
        let config = InterviewConfig {
            max_follow_ups_per_anchor: 0,
            ..Default::default()
        };
        let detector = SignalDetector::new(&default_signal_bank());
        let mut state = InterviewState::new(&config);
        let transition = answer(&mut state, &config, &detector, "ok");
        assert_eq!(transition.next_question_type, QuestionType::Anchor);
    }

    #[test]
    fn test_answers_and_signals_are_recorded() {
        let (mut state, config, detector) = setup();
        answer(&mut state, &config, &detector, "ok");
        answer(&mut state, &config, &detector, "fine");
        assert_eq!(state.answers().len(), 2);
        assert_eq!(state.answers()[1].phase, InterviewPhase::FollowUp);
        assert_eq!(state.signals_seen().get(&SignalKind::VagueAnswer), Some(&2));
        assert_eq!(state.questions_asked(), 2);
        assert_eq!(state.confidence().score(InterviewAnchor::Problem), 20);
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let (mut state, config, detector) = setup();
        answer(&mut state, &config, &detector, "ok");
        let json = serde_json::to_string(&state).unwrap();
        let restored: InterviewState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
