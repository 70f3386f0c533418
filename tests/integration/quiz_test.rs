//! Structured Quiz Integration Tests

use std::sync::Arc;

use elicit_engine::models::CompanyProfile;
use elicit_engine::services::quiz::FinishReason;
use elicit_engine::{
    AppError, ConfidenceCategory, ContentSource, Engine, EngineConfig, PriorKnowledge, QuizStep,
};
use elicit_llm::mock::MockLlmProvider;

use crate::common::{engine_with, offline_engine};

const DETAILED_ANSWER: &str =
    "Customers complain because we retype every order by hand and it takes hours every day";

#[tokio::test]
async fn test_offline_quiz_reaches_a_stopping_point() {
    let engine = offline_engine();
    let mut session = engine.start_quiz(&PriorKnowledge::default());

    let mut step = session.next_question().await;
    let mut turns = 0;
    while let Some(question) = step.question().cloned() {
        assert_eq!(question.source, ContentSource::Fallback);
        let result = session.submit_answer(DETAILED_ANSWER).await.unwrap();
        assert_eq!(result.analysis_source, ContentSource::Fallback);
        step = result.next;
        turns += 1;
        assert!(turns <= 15, "quiz must stop at max_questions");
    }

    match step {
        QuizStep::Finished { reason, snapshot } => {
            assert_eq!(snapshot.questions_asked, turns);
            match reason {
                FinishReason::Ready => assert!(snapshot.gaps.is_empty() && snapshot.ready),
                FinishReason::QuestionLimit => assert_eq!(turns, 15),
            }
        }
        QuizStep::Question(_) => unreachable!(),
    }
    assert!(session.next_question().await.is_finished());
    assert!(matches!(
        session.submit_answer("more").await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_first_question_targets_worst_gap_after_seeding() {
    let engine = offline_engine();
    let prior = PriorKnowledge {
        company: Some(CompanyProfile {
            name: Some("Crumb & Co".to_string()),
            employee_count: Some(12),
            industry: Some("Bakery".to_string()),
            website: Some("https://crumb.example".to_string()),
            description: Some("Two-location artisan bakery".to_string()),
        }),
        technologies: vec!["Square".to_string(), "Xero".to_string()],
    };
    let mut session = engine.start_quiz(&prior);

    let progress = session.progress();
    assert_eq!(progress.facts_collected, 7);
    assert!(!progress.ready);

    let step = session.next_question().await;
    let question = step.question().unwrap();
    assert_eq!(question.id, "q1");
    assert_eq!(question.target, ConfidenceCategory::PainPoints);
    assert_eq!(
        question.secondary,
        vec![ConfidenceCategory::GoalsPriorities, ConfidenceCategory::Operations]
    );
    assert!(question.text.contains("Feel free to touch on"));
}

#[tokio::test]
async fn test_malformed_model_output_falls_back_after_one_repair() {
    let provider = Arc::new(MockLlmProvider::with_texts(&[
        r#"{"acknowledgment": "", "question": "What slows you down most?"}"#,
        "Sure! Here is the analysis you asked for.",
        "still not json",
        r#"{"acknowledgment": "That adds up fast.", "question": "What would you fix first?"}"#,
    ]));
    let engine = engine_with(provider.clone());
    let mut session = engine.start_quiz(&PriorKnowledge::default());

    let first = session.next_question().await;
    assert_eq!(first.question().unwrap().text, "What slows you down most?");

    let result = session.submit_answer(DETAILED_ANSWER).await.unwrap();
    assert_eq!(result.analysis_source, ContentSource::Fallback);
    assert_eq!(result.acknowledgment, "That adds up fast.");
    assert_eq!(
        result.signals_detected,
        vec!["manual_work", "customer_impact", "time_cost"]
    );
    assert_eq!(
        session.state().confidence().score(ConfidenceCategory::PainPoints),
        40
    );
    assert_eq!(provider.call_count(), 4);
}

#[tokio::test]
async fn test_question_limit_reports_true_readiness() {
    let mut config = EngineConfig::default();
    config.quiz.max_questions = 3;
    let engine = Engine::new(config, None).unwrap();
    let mut session = engine.start_quiz(&PriorKnowledge::default());

    session.next_question().await;
    let mut last = None;
    for _ in 0..3 {
        last = Some(session.submit_answer("not sure").await.unwrap());
    }
    let last = last.unwrap();
    assert!(matches!(
        last.next,
        QuizStep::Finished {
            reason: FinishReason::QuestionLimit,
            ..
        }
    ));
    assert!(!last.ready);
    assert_eq!(last.progress.questions_asked, 3);
}

#[tokio::test]
async fn test_step_serializes_with_type_tag() {
    let engine = offline_engine();
    let mut session = engine.start_quiz(&PriorKnowledge::default());
    let step = session.next_question().await;

    let json = serde_json::to_value(&step).unwrap();
    assert_eq!(json["type"], "question");
    assert_eq!(json["target"], "pain_points");
    assert_eq!(json["source"], "fallback");
}
