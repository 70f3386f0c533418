//! Voice Interview Integration Tests
//!
//! Drives full interviews through `Engine::start_interview`.

use std::sync::Arc;
use std::time::Duration;

use elicit_engine::services::interview::{CompletionReason, InterviewState, QuestionType};
use elicit_engine::{AppError, ContentSource, EngineConfig, InterviewAnchor};
use elicit_llm::mock::MockLlmProvider;
use elicit_llm::LlmError;

use crate::common::{engine_with, offline_engine, RICH_ANSWER};

#[tokio::test]
async fn test_vague_answers_cap_follow_ups_then_advance() {
    let engine = offline_engine();
    let mut session = engine.start_interview();

    let mut results = Vec::new();
    for _ in 0..5 {
        results.push(session.submit_answer("ok").await.unwrap());
    }

    assert_eq!(results[0].next_question_type, QuestionType::FollowUp);
    assert_eq!(results[1].next_question_type, QuestionType::FollowUp);
    assert_eq!(results[2].next_question_type, QuestionType::Anchor);
    assert_eq!(results[2].anchor, 2);
    assert!(results[2]
        .next_question
        .starts_with("Walk me through how that works today"));

    // Counting restarts on anchor 2
    assert_eq!(results[3].next_question_type, QuestionType::FollowUp);
    assert_eq!(results[3].anchor, 2);
    assert_eq!(results[4].next_question_type, QuestionType::FollowUp);
    assert_eq!(session.progress().questions_asked, 5);
}

#[tokio::test]
async fn test_rich_answer_skips_follow_up() {
    let engine = offline_engine();
    let mut session = engine.start_interview();

    let result = session.submit_answer(RICH_ANSWER).await.unwrap();
    assert_eq!(result.next_question_type, QuestionType::Anchor);
    assert_eq!(result.anchor, 2);
    assert!(result.signals_detected.is_empty());
    assert!(!result.interview_complete);
}

#[tokio::test]
async fn test_answering_priority_anchor_completes() {
    let engine = offline_engine();
    let mut session = engine.start_interview();

    session.submit_answer(RICH_ANSWER).await.unwrap();
    session.submit_answer(RICH_ANSWER).await.unwrap();
    let last = session
        .submit_answer("Fix scheduling so the team stops double booking")
        .await
        .unwrap();

    assert!(last.interview_complete);
    assert_eq!(last.next_question_type, QuestionType::Summary);
    assert_eq!(
        last.next_question,
        EngineConfig::default().interview.prompts.wrap_up
    );
    assert_eq!(
        session.state().completion(),
        Some(CompletionReason::FinalAnchor)
    );
    assert_eq!(last.progress.percent, 100);
}

#[tokio::test]
async fn test_question_ceiling_completes_interview() {
    let mut config = EngineConfig::default();
    config.interview.max_total_questions = 2;
    let engine = elicit_engine::Engine::new(config, None).unwrap();
    let mut session = engine.start_interview();

    session.submit_answer("ok").await.unwrap();
    let second = session.submit_answer("ok").await.unwrap();
    assert!(second.interview_complete);
    assert_eq!(second.next_question_type, QuestionType::Summary);
    assert_eq!(
        session.state().completion(),
        Some(CompletionReason::QuestionLimit)
    );

    let rejected = session.submit_answer("ok").await;
    assert!(matches!(rejected, Err(AppError::Validation(_))));
    assert_eq!(session.progress().questions_asked, 2);
}

#[tokio::test]
async fn test_provider_failure_falls_back_without_error() {
    let provider = Arc::new(MockLlmProvider::failing(
        LlmError::ServerError {
            message: "overloaded".to_string(),
            status: Some(529),
        },
        4,
    ));
    let engine = engine_with(provider.clone());
    let mut session = engine.start_interview();

    let result = session
        .submit_answer("It is a nightmare, every week we lose a whole day to it")
        .await
        .unwrap();
    assert_eq!(result.acknowledgment_source, ContentSource::Fallback);
    assert_eq!(result.acknowledgment, "That sounds genuinely frustrating.");
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out_and_turn_completes() {
    let provider = Arc::new(MockLlmProvider::slow(Duration::from_secs(60), "Too late."));
    let engine = engine_with(provider.clone());
    let mut session = engine.start_interview();

    let result = session.submit_answer(RICH_ANSWER).await.unwrap();
    assert_eq!(result.acknowledgment_source, ContentSource::Fallback);
    assert_eq!(result.anchor, 2);
    assert_eq!(session.state().current_anchor(), InterviewAnchor::Process);
}

#[tokio::test]
async fn test_model_acknowledgment_only_on_anchor_answers() {
    let provider = Arc::new(MockLlmProvider::with_texts(&[
        "Thanks, that paints a clear picture.",
    ]));
    let engine = engine_with(provider.clone());
    let mut session = engine.start_interview();

    let first = session.submit_answer("ok").await.unwrap();
    assert_eq!(first.acknowledgment_source, ContentSource::Model);
    assert_eq!(first.acknowledgment, "Thanks, that paints a clear picture.");

    let follow_up = session.submit_answer("ok").await.unwrap();
    assert_eq!(follow_up.acknowledgment_source, ContentSource::Fallback);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_state_survives_persistence_round_trip() {
    let engine = offline_engine();
    let mut session = engine.start_interview();
    session.submit_answer("ok").await.unwrap();

    let json = serde_json::to_string(session.state()).unwrap();
    let restored: InterviewState = serde_json::from_str(&json).unwrap();
    let mut resumed = engine.resume_interview(restored);

    assert_eq!(resumed.current_question(), session.current_question());
    let next = resumed.submit_answer("ok").await.unwrap();
    assert_eq!(next.next_question_type, QuestionType::FollowUp);
    assert_eq!(next.progress.follow_ups_for_current_anchor, 2);
}
