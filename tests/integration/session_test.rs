//! Session Handle Integration Tests
//!
//! A second turn submitted while the first is awaiting the model must be
//! rejected, and the state must only ever reflect the first turn.

use std::sync::Arc;
use std::time::Duration;

use elicit_engine::{AppError, PriorKnowledge, SessionHandle};
use elicit_llm::mock::MockLlmProvider;

use crate::common::{engine_with, offline_engine, RICH_ANSWER};

#[tokio::test(start_paused = true)]
async fn test_concurrent_interview_turn_is_rejected() {
    let provider = Arc::new(MockLlmProvider::slow(
        Duration::from_secs(2),
        "Thanks for walking me through it.",
    ));
    let engine = engine_with(provider);
    let handle = SessionHandle::new(engine.start_interview());

    let in_flight = {
        let handle = handle.clone();
        tokio::spawn(async move {
            let mut session = handle.turn().unwrap();
            session.submit_answer(RICH_ANSWER).await.unwrap()
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(matches!(handle.turn(), Err(AppError::SessionBusy(_))));

    let first = in_flight.await.unwrap();
    assert_eq!(first.anchor, 2);

    let session = handle.turn().unwrap();
    assert_eq!(session.progress().questions_asked, 1);
}

#[tokio::test]
async fn test_sequential_turns_are_accepted() {
    let engine = offline_engine();
    let handle = SessionHandle::new(engine.start_quiz(&PriorKnowledge::default()));

    {
        let mut session = handle.turn().unwrap();
        session.next_question().await;
        session.submit_answer(RICH_ANSWER).await.unwrap();
    }
    {
        let mut session = handle.turn().unwrap();
        session.submit_answer(RICH_ANSWER).await.unwrap();
    }

    let session = handle.read().await;
    assert_eq!(session.state().questions_asked(), 2);
    assert_eq!(session.id(), handle.id());
}

#[tokio::test]
async fn test_sessions_do_not_block_each_other() {
    let engine = offline_engine();
    let a = SessionHandle::new(engine.start_interview());
    let b = SessionHandle::new(engine.start_interview());

    let _held = a.turn().unwrap();
    let mut other = b.turn().unwrap();
    other.submit_answer("ok").await.unwrap();
    assert_ne!(a.id(), b.id());
}
