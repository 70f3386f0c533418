//! Confidence Tracker Integration Tests

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use elicit_engine::services::confidence::ConfidenceState;
use elicit_engine::{Category, ConfidenceCategory, EngineConfig};

/// Two-topic category set for exercising the generic tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
enum Topic {
    A,
    B,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Category for Topic {
    fn all() -> &'static [Self] {
        &[Topic::A, Topic::B]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Topic::A => "a",
            Topic::B => "b",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Topic::A => "Topic A",
            Topic::B => "Topic B",
        }
    }
}

#[test]
fn test_gap_ordering_by_deficit() {
    let mut state = ConfidenceState::new(BTreeMap::from([(Topic::A, 80), (Topic::B, 60)]));
    state.update_score(Topic::A, 20);
    state.update_score(Topic::B, 50);

    assert_eq!(state.deficit(Topic::A), 60);
    assert_eq!(state.deficit(Topic::B), 10);
    assert_eq!(state.sorted_gaps(), vec![Topic::A, Topic::B]);
}

#[test]
fn test_gap_ordering_ties_follow_declaration_order() {
    let mut state = ConfidenceState::new(BTreeMap::from([(Topic::A, 50), (Topic::B, 70)]));
    state.update_score(Topic::B, 20);
    assert_eq!(state.sorted_gaps(), vec![Topic::A, Topic::B]);
}

#[test]
fn test_quiz_readiness_flips_in_single_batch() {
    let thresholds = EngineConfig::default().quiz.thresholds;
    let mut state = ConfidenceState::new(thresholds.clone());

    for (category, threshold) in &thresholds {
        state.update_score(*category, threshold - 1);
    }
    assert_eq!(state.sorted_gaps().len(), 8);
    assert!(!state.is_ready());

    let categories: Vec<ConfidenceCategory> = ConfidenceCategory::all().to_vec();
    let (last, rest) = categories.split_last().unwrap();
    for category in rest {
        state.update_score(*category, 1);
        assert!(!state.is_ready());
    }
    state.update_score(*last, 1);

    assert!(state.sorted_gaps().is_empty());
    assert!(state.is_ready());
    assert_eq!(state.overall_percent(), 100);
}

#[test]
fn test_scores_clamp_at_one_hundred() {
    let mut state = ConfidenceState::new(BTreeMap::from([(Topic::A, 80)]));
    assert_eq!(state.update_score(Topic::A, u32::MAX), 100);
    assert_eq!(state.update_score(Topic::A, 5), 100);
    assert!(state.is_ready());
}

#[test]
fn test_snapshot_round_trips_with_recomputed_gaps() {
    let mut state = ConfidenceState::new(BTreeMap::from([(Topic::A, 80), (Topic::B, 60)]));
    state.update_score(Topic::B, 60);
    state.record_question();

    let json = serde_json::to_string(&state).unwrap();
    let restored: ConfidenceState<Topic> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.gaps(), &[Topic::A]);
    assert_eq!(restored.questions_asked(), 1);
    assert!(!restored.is_ready());
}

#[test]
#[should_panic(expected = "not tracked")]
fn test_untracked_category_is_a_programmer_error() {
    let mut state = ConfidenceState::new(BTreeMap::from([(Topic::A, 80)]));
    state.update_score(Topic::B, 10);
}
