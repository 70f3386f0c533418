//! Signal Detector Integration Tests
//!
//! Runs the engine's configured detector, built from the default bank or a
//! TOML-supplied one.

use elicit_engine::{Engine, EngineConfig, SignalKind};

use crate::common::{offline_engine, RICH_ANSWER};

#[test]
fn test_any_input_yields_a_valid_detection() {
    let engine = offline_engine();
    for answer in ["", "   ", "\u{0}\u{7}", "ok", "🍞🍞🍞", RICH_ANSWER] {
        let detection = engine.detector().detect(answer);
        assert!(detection.suggested_follow_ups.len() <= 2);
        assert!(detection.signals.iter().all(|s| (0.0..=1.0).contains(&s.confidence)));
    }
}

#[test]
fn test_rich_answer_has_no_signals_and_no_follow_ups() {
    let detection = offline_engine().detector().detect(RICH_ANSWER);
    assert!(detection.signals.is_empty());
    assert!(detection.suggested_follow_ups.is_empty());
    assert!(detection.should_probe_deeper);
}

#[test]
fn test_content_signals_do_not_probe() {
    let detection = offline_engine()
        .detector()
        .detect("Our customers complain because we retype every invoice by hand");
    assert_eq!(
        detection.kinds(),
        vec![SignalKind::ManualWork, SignalKind::CustomerImpact]
    );
    assert!(!detection.should_probe_deeper);
    assert_eq!(detection.suggested_follow_ups.len(), 2);
}

#[test]
fn test_configured_bank_replaces_default() {
    let config = EngineConfig::from_toml_str(
        r#"
        [[signals]]
        name = "vague_answer"
        min_words = 3
        follow_ups = ["Tell me more?"]

        [[signals]]
        name = "time_cost"
        patterns = ["forever"]
        follow_ups = ["How long exactly?"]
        "#,
    )
    .unwrap();
    let engine = Engine::new(config, None).unwrap();

    let detection = engine.detector().detect("It takes forever to close the books");
    assert_eq!(detection.kinds(), vec![SignalKind::TimeCost]);
    assert_eq!(detection.suggested_follow_ups, vec!["How long exactly?"]);

    // "by hand" is not part of this bank
    let manual = engine.detector().detect("We count stock by hand on Sundays");
    assert!(manual.signals.is_empty());

    let vague = engine.detector().detect("not sure");
    assert!(vague.is_vague());
}
