//! Engine
//!
//! Per-process lifecycle object. Built once at startup from a validated
//! configuration and passed by reference to whatever drives sessions. Holds
//! only read-only data, so sessions created from it share nothing mutable.

use std::sync::Arc;

use tracing::{info, warn};

use elicit_llm::{create_provider, LlmProvider};

use crate::models::{EngineConfig, PriorKnowledge};
use crate::services::collaborator::Collaborator;
use crate::services::generator::Generator;
use crate::services::interview::{InterviewSession, InterviewState};
use crate::services::quiz::{QuizSession, QuizState};
use crate::services::signals::SignalDetector;
use crate::utils::error::{AppError, AppResult};

pub struct Engine {
    config: Arc<EngineConfig>,
    detector: Arc<SignalDetector>,
    generator: Generator,
}

impl Engine {
    /// Create an engine with an explicit (optional) model provider.
    pub fn new(config: EngineConfig, provider: Option<Arc<dyn LlmProvider>>) -> AppResult<Self> {
        config.validate()?;

        let detector = Arc::new(SignalDetector::new(&config.signals));
        let collaborator = Collaborator::new(provider, config.collaborator.timeout());

        info!(
            provider = collaborator_name(&collaborator),
            signals = config.signals.len(),
            max_questions = config.quiz.max_questions,
            max_total_questions = config.interview.max_total_questions,
            "Engine started"
        );

        Ok(Self {
            config: Arc::new(config),
            detector,
            generator: Generator::new(collaborator),
        })
    }

    /// Create an engine, building the provider from the `[llm]` section.
    ///
    /// A configured provider whose API key is not set is skipped with a
    /// warning; every turn then uses the deterministic path.
    pub fn from_config(config: EngineConfig) -> AppResult<Self> {
        let provider = match &config.llm {
            None => None,
            Some(llm) => match llm.resolve_api_key() {
                Some(key) => {
                    let provider = create_provider(
                        llm.to_provider_config(Some(key)),
                        config.collaborator.timeout(),
                    )
                    .map_err(|e| AppError::config(format!("llm provider: {}", e)))?;
                    Some(provider)
                }
                None => {
                    warn!(
                        env_var = llm.api_key_var(),
                        "API key not set; running without a model collaborator"
                    );
                    None
                }
            },
        };
        Self::new(config, provider)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn detector(&self) -> &SignalDetector {
        &self.detector
    }

    pub fn has_collaborator(&self) -> bool {
        self.generator.collaborator().is_available()
    }

    /// Confirm the configured model collaborator answers within the timeout.
    pub async fn ping(&self) -> AppResult<()> {
        let collaborator = self.generator.collaborator();
        if !collaborator.is_available() {
            return Err(AppError::config(
                "no model collaborator configured (check [llm] and its API key)",
            ));
        }
        collaborator
            .health_check()
            .await
            .map_err(|e| AppError::internal(format!("model health check failed: {}", e)))?;
        info!(timeout = ?collaborator.timeout(), "Model collaborator reachable");
        Ok(())
    }

    pub fn start_interview(&self) -> InterviewSession {
        let state = InterviewState::new(&self.config.interview);
        info!(interview_id = %state.id, "Interview started");
        self.resume_interview(state)
    }

    pub fn start_quiz(&self, prior: &PriorKnowledge) -> QuizSession {
        let state = QuizState::with_prior_knowledge(&self.config.quiz, prior);
        info!(
            quiz_id = %state.id,
            seeded_facts = state.confidence().facts_collected(),
            gaps = state.confidence().gaps().len(),
            "Quiz started"
        );
        self.resume_quiz(state)
    }

    /// Continue an interview from persisted state.
    pub fn resume_interview(&self, state: InterviewState) -> InterviewSession {
        InterviewSession::new(
            state,
            Arc::clone(&self.config),
            Arc::clone(&self.detector),
            self.generator.clone(),
        )
    }

    /// Continue a quiz from persisted state.
    pub fn resume_quiz(&self, state: QuizState) -> QuizSession {
        QuizSession::new(
            state,
            Arc::clone(&self.config),
            Arc::clone(&self.detector),
            self.generator.clone(),
        )
    }

    /// Tear the engine down. Sessions already handed out keep working.
    pub fn shutdown(self) {
        info!(
            strong_refs = Arc::strong_count(&self.config),
            "Engine shut down"
        );
    }
}

fn collaborator_name(collaborator: &Collaborator) -> &'static str {
    if collaborator.is_available() {
        "model"
    } else {
        "none"
    }
}
