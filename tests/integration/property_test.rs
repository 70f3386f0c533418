//! Property Tests
//!
//! State-machine properties that must hold for every answer sequence.

use proptest::prelude::*;

use elicit_engine::models::{default_signal_bank, EngineConfig, InterviewConfig};
use elicit_engine::services::analyzer::AnswerAnalysis;
use elicit_engine::services::confidence::{ConfidenceState, MAX_SCORE};
use elicit_engine::services::generator::{fallback_question, template_acknowledgment};
use elicit_engine::services::guardrail::sanitize_answer;
use elicit_engine::services::interview::{InterviewState, QuestionType};
use elicit_engine::services::signals::SignalDetector;
use elicit_engine::{Category, ConfidenceCategory};

/// Answers mixing vague, plain, and signal-heavy text.
fn answer_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ok".to_string()),
        Just(String::new()),
        Just("We run a small bakery with two locations downtown".to_string()),
        Just("It is a nightmare, we retype every order by hand for hours".to_string()),
        Just("Customers complain and we cannot scale past this bottleneck".to_string()),
        "[a-zA-Z ,.]{0,80}",
    ]
}

fn category_strategy() -> impl Strategy<Value = ConfidenceCategory> {
    (0..ConfidenceCategory::all().len()).prop_map(|i| ConfidenceCategory::all()[i])
}

// ── Gap/ready invariant and score clamping ────────────────────────────────

proptest! {
    #[test]
    fn ready_iff_every_category_meets_threshold(
        updates in prop::collection::vec((category_strategy(), any::<u32>()), 0..40)
    ) {
        let thresholds = EngineConfig::default().quiz.thresholds;
        let mut state = ConfidenceState::new(thresholds);

        for (category, delta) in updates {
            let before = state.score(category);
            let after = state.update_score(category, delta % 250);
            prop_assert!(after >= before);
            prop_assert!(after <= MAX_SCORE);

            let all_met = state
                .categories()
                .all(|c| state.score(c) >= state.threshold(c));
            prop_assert_eq!(state.is_ready(), all_met);
            prop_assert_eq!(state.is_ready(), state.gaps().is_empty());
        }
    }

    #[test]
    fn huge_deltas_never_exceed_max_score(
        category in category_strategy(),
        deltas in prop::collection::vec(any::<u32>(), 1..10)
    ) {
        let mut state = ConfidenceState::new(EngineConfig::default().quiz.thresholds);
        for delta in deltas {
            prop_assert!(state.update_score(category, delta) <= MAX_SCORE);
        }
    }
}

// ── Interview termination and follow-up bound ─────────────────────────────

fn run_interview(
    config: &InterviewConfig,
    answers: &[String],
) -> (InterviewState, Vec<QuestionType>, Vec<u32>) {
    let detector = SignalDetector::new(&default_signal_bank());
    let mut state = InterviewState::new(config);
    let mut types = Vec::new();
    let mut asked = Vec::new();

    for answer in answers {
        if state.is_complete() {
            break;
        }
        let detection = detector.detect(answer);
        let transition = state.apply(answer, &detection, config);
        types.push(transition.next_question_type);
        asked.push(state.questions_asked());
    }
    (state, types, asked)
}

proptest! {
    #[test]
    fn interview_completes_within_ceiling(
        max_follow_ups in 0u32..4,
        max_total in 1u32..12,
        answers in prop::collection::vec(answer_strategy(), 12..20)
    ) {
        let config = InterviewConfig {
            max_follow_ups_per_anchor: max_follow_ups,
            max_total_questions: max_total,
            ..Default::default()
        };
        let (state, types, asked) = run_interview(&config, &answers);

        prop_assert!(state.is_complete());
        prop_assert!(state.questions_asked() <= max_total);
        prop_assert!(asked.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(types.last().copied(), Some(QuestionType::Summary));
    }

    #[test]
    fn consecutive_follow_ups_never_exceed_bound(
        max_follow_ups in 0u32..4,
        answers in prop::collection::vec(answer_strategy(), 1..20)
    ) {
        let config = InterviewConfig {
            max_follow_ups_per_anchor: max_follow_ups,
            max_total_questions: 20,
            ..Default::default()
        };
        let (_, types, _) = run_interview(&config, &answers);

        let mut run = 0u32;
        for question_type in types {
            if question_type == QuestionType::FollowUp {
                run += 1;
                prop_assert!(run <= max_follow_ups);
            } else {
                run = 0;
            }
        }
    }
}

// ── Fallback determinism ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn fallback_path_is_deterministic(
        answer in answer_strategy(),
        target in category_strategy(),
        secondary in prop::collection::vec(category_strategy(), 0..3)
    ) {
        let a = SignalDetector::new(&default_signal_bank()).detect(&answer);
        let b = SignalDetector::new(&default_signal_bank()).detect(&answer);
        prop_assert_eq!(&a, &b);

        prop_assert_eq!(template_acknowledgment(&a), template_acknowledgment(&b));
        prop_assert_eq!(
            fallback_question(target, &secondary, None),
            fallback_question(target, &secondary, None)
        );
        prop_assert_eq!(
            AnswerAnalysis::from_detection(&a, &answer, target, &secondary),
            AnswerAnalysis::from_detection(&b, &answer, target, &secondary)
        );
    }

    #[test]
    fn identical_interview_states_take_identical_fallback_turns(
        answers in prop::collection::vec(answer_strategy(), 1..8)
    ) {
        let config = InterviewConfig::default();
        let (first, first_types, _) = run_interview(&config, &answers);
        let (second, second_types, _) = run_interview(&config, &answers);

        prop_assert_eq!(first_types, second_types);
        prop_assert_eq!(first.current_question(), second.current_question());
        prop_assert_eq!(first.current_anchor(), second.current_anchor());
        prop_assert_eq!(first.questions_asked(), second.questions_asked());
    }
}

// ── Prompt-input guardrail ────────────────────────────────────────────────

proptest! {
    #[test]
    fn sanitized_answers_cannot_close_the_wrapper(
        raw in ".{0,200}",
        max_chars in 1usize..120
    ) {
        let sanitized = sanitize_answer(&raw, max_chars);
        prop_assert!(!sanitized.text.contains('<'));
        prop_assert!(!sanitized.text.contains('>'));
        prop_assert!(sanitized.text.chars().count() <= max_chars);
    }
}
