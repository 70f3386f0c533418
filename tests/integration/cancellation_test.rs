//! Cancellation Integration Tests
//!
//! A caller may drop a turn future at any await point. Whatever was
//! committed before that point must stay committed, and nothing after it
//! may leak into the state.

use std::sync::Arc;
use std::time::Duration;

use elicit_engine::services::generator::fallback_question;
use elicit_engine::{ContentSource, InterviewAnchor, PriorKnowledge};
use elicit_llm::mock::MockLlmProvider;

use crate::common::{engine_with, RICH_ANSWER};

const FIRST_TURN: &str = r#"{"acknowledgment": "", "question": "What slows you down most?"}"#;
const ANALYSIS: &str = r#"{"confidenceBoosts": {"pain_points": 30}, "detectedSignals": ["manual_work"], "sentiment": "frustrated"}"#;
const SECOND_TURN: &str =
    r#"{"acknowledgment": "That adds up.", "question": "What would you fix first?"}"#;

#[tokio::test(start_paused = true)]
async fn test_dropped_interview_turn_keeps_committed_transition() {
    let provider = Arc::new(MockLlmProvider::slow(Duration::from_secs(5), "Thanks."));
    let engine = engine_with(provider.clone());
    let mut session = engine.start_interview();

    let dropped =
        tokio::time::timeout(Duration::from_secs(1), session.submit_answer(RICH_ANSWER)).await;
    assert!(dropped.is_err());
    assert_eq!(provider.call_count(), 1);

    let state = session.state();
    assert_eq!(state.current_anchor(), InterviewAnchor::Process);
    assert_eq!(state.questions_asked(), 1);
    assert_eq!(state.answers().len(), 1);
    assert_eq!(
        session.current_question(),
        engine
            .config()
            .interview
            .prompts
            .for_anchor(InterviewAnchor::Process)
    );

    let next = session.submit_answer(RICH_ANSWER).await.unwrap();
    assert_eq!(next.anchor, 3);
    assert_eq!(session.state().questions_asked(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_quiz_turn_during_analysis_changes_nothing() {
    let provider = Arc::new(
        MockLlmProvider::with_texts(&[FIRST_TURN, ANALYSIS, SECOND_TURN])
            .with_delay(Duration::from_secs(5)),
    );
    let engine = engine_with(provider.clone());
    let mut session = engine.start_quiz(&PriorKnowledge::default());

    let first = session.next_question().await;
    assert_eq!(first.question().unwrap().text, "What slows you down most?");
    let before = session.state().clone();

    let dropped = tokio::time::timeout(
        Duration::from_secs(1),
        session.submit_answer("We retype every order by hand"),
    )
    .await;
    assert!(dropped.is_err());
    assert_eq!(provider.call_count(), 2);
    assert_eq!(session.state(), &before);
    assert_eq!(session.state().questions_asked(), 0);
    assert!(session.state().history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_quiz_turn_during_generation_leaves_template_question() {
    let provider = Arc::new(
        MockLlmProvider::with_texts(&[FIRST_TURN, ANALYSIS, SECOND_TURN])
            .with_delay(Duration::from_secs(5)),
    );
    let engine = engine_with(provider.clone());
    let mut session = engine.start_quiz(&PriorKnowledge::default());
    session.next_question().await;

    // Analysis finishes after 5s; the generator call would need 5s more.
    let dropped = tokio::time::timeout(
        Duration::from_secs(7),
        session.submit_answer("We retype every order by hand"),
    )
    .await;
    assert!(dropped.is_err());
    assert_eq!(provider.call_count(), 3);

    let state = session.state();
    assert_eq!(state.questions_asked(), 1);
    assert_eq!(state.history().len(), 1);
    let pending = state.pending().cloned().unwrap();
    assert_eq!(pending.id, "q2");
    assert_eq!(pending.source, ContentSource::Fallback);
    assert_eq!(
        pending.text,
        fallback_question(pending.target, &pending.secondary, None)
    );

    let resumed = session.next_question().await;
    assert_eq!(resumed.question(), Some(&pending));
    assert_eq!(provider.call_count(), 3);
}
