//! Configuration Loading Tests

use std::io::Write;

use tempfile::{NamedTempFile, TempDir};

use elicit_engine::{AppError, ConfidenceCategory, Engine, EngineConfig};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_config_from_disk() {
    let file = write_config(
        r#"
        [quiz]
        max_questions = 6

        [quiz.thresholds]
        company_basics = 50
        tech_stack = 40
        pain_points = 70
        operations = 40
        goals_priorities = 60
        quantifiable_metrics = 30
        industry_context = 30
        buying_signals = 20

        [interview]
        max_follow_ups_per_anchor = 1
        max_total_questions = 6

        [collaborator]
        timeout_ms = 2500
        max_answer_chars = 1200

        [llm]
        provider = "anthropic"
        model = "claude-3-5-haiku-latest"
        api_key_env = "ELICIT_TEST_KEY_THAT_IS_NEVER_SET"
        "#,
    );

    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.quiz.max_questions, 6);
    assert_eq!(config.quiz.thresholds[&ConfidenceCategory::BuyingSignals], 20);
    assert_eq!(config.interview.max_follow_ups_per_anchor, 1);
    assert_eq!(config.collaborator.max_answer_chars, 1200);
    assert_eq!(
        config.llm.as_ref().unwrap().api_key_var(),
        "ELICIT_TEST_KEY_THAT_IS_NEVER_SET"
    );

    // Missing API key means no collaborator, not a startup failure
    let engine = Engine::from_config(config).unwrap();
    assert!(!engine.has_collaborator());
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = write_config("");
    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let result = EngineConfig::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn test_unknown_signal_name_fails_at_load() {
    let file = write_config(
        r#"
        [[signals]]
        name = "budget_anxiety"
        patterns = ["budget"]
        follow_ups = ["What is the budget?"]
        "#,
    );
    assert!(matches!(
        EngineConfig::load(file.path()),
        Err(AppError::Toml(_))
    ));
}

#[test]
fn test_unknown_field_fails_at_load() {
    let file = write_config(
        r#"
        [interview]
        max_followups = 3
        "#,
    );
    assert!(EngineConfig::load(file.path()).is_err());
}
