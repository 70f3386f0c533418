//! Engine Configuration
//!
//! Read-only configuration loaded once at process start and shared by every
//! session. Every TOML section is optional; missing sections take the
//! built-in defaults. All entry points return a validated config.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use elicit_core::{Category, ConfidenceCategory, InterviewAnchor, SignalKind};
use elicit_llm::{ProviderConfig, ProviderType};

use super::signal_bank::{default_signal_bank, SignalRule};
use crate::utils::error::{AppError, AppResult};

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Quiz-mode tunables
    #[serde(default)]
    pub quiz: QuizConfig,
    /// Voice-interview tunables
    #[serde(default)]
    pub interview: InterviewConfig,
    /// Model-collaborator call settings
    #[serde(default)]
    pub collaborator: CollaboratorConfig,
    /// Signal bank, in declaration order
    #[serde(default = "default_signal_bank")]
    pub signals: Vec<SignalRule>,
    /// Optional model provider; absent means every turn uses the fallback path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmSection>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quiz: QuizConfig::default(),
            interview: InterviewConfig::default(),
            collaborator: CollaboratorConfig::default(),
            signals: default_signal_bank(),
            llm: None,
        }
    }
}

/// `[quiz]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizConfig {
    /// Hard ceiling on questions asked in one quiz
    #[serde(default = "default_quiz_max_questions")]
    pub max_questions: u32,
    /// Threshold per category
    #[serde(default = "default_quiz_thresholds")]
    pub thresholds: BTreeMap<ConfidenceCategory, u32>,
}

fn default_quiz_max_questions() -> u32 {
    15
}

fn default_quiz_thresholds() -> BTreeMap<ConfidenceCategory, u32> {
    ConfidenceCategory::all()
        .iter()
        .map(|c| (*c, c.default_threshold()))
        .collect()
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            max_questions: default_quiz_max_questions(),
            thresholds: default_quiz_thresholds(),
        }
    }
}

/// `[interview]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterviewConfig {
    #[serde(default = "default_max_follow_ups")]
    pub max_follow_ups_per_anchor: u32,
    #[serde(default = "default_max_total_questions")]
    pub max_total_questions: u32,
    /// Threshold applied to each anchor's confidence
    #[serde(default = "default_anchor_threshold")]
    pub anchor_threshold: u32,
    #[serde(default)]
    pub prompts: InterviewPrompts,
}

fn default_max_follow_ups() -> u32 {
    2
}

fn default_max_total_questions() -> u32 {
    10
}

fn default_anchor_threshold() -> u32 {
    60
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            max_follow_ups_per_anchor: default_max_follow_ups(),
            max_total_questions: default_max_total_questions(),
            anchor_threshold: default_anchor_threshold(),
            prompts: InterviewPrompts::default(),
        }
    }
}

impl InterviewConfig {
    /// Anchor thresholds, one entry per anchor.
    pub fn anchor_thresholds(&self) -> BTreeMap<InterviewAnchor, u32> {
        InterviewAnchor::all()
            .iter()
            .map(|a| (*a, self.anchor_threshold))
            .collect()
    }
}

/// `[interview.prompts]` section: the three fixed anchor questions plus the
/// closing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterviewPrompts {
    #[serde(default = "default_problem_prompt")]
    pub problem: String,
    #[serde(default = "default_process_prompt")]
    pub process: String,
    #[serde(default = "default_priority_prompt")]
    pub priority: String,
    #[serde(default = "default_wrap_up_prompt")]
    pub wrap_up: String,
}

fn default_problem_prompt() -> String {
    "What's the biggest challenge holding your business back right now?".to_string()
}

fn default_process_prompt() -> String {
    "Walk me through how that works today. Who's involved, and what tools or steps does it take?"
        .to_string()
}

fn default_priority_prompt() -> String {
    "If you could fix one thing in the next 90 days, what would make the biggest difference?"
        .to_string()
}

fn default_wrap_up_prompt() -> String {
    "Thanks, that gives me a clear picture. I'll pull together your summary now.".to_string()
}

impl Default for InterviewPrompts {
    fn default() -> Self {
        Self {
            problem: default_problem_prompt(),
            process: default_process_prompt(),
            priority: default_priority_prompt(),
            wrap_up: default_wrap_up_prompt(),
        }
    }
}

impl InterviewPrompts {
    /// The fixed prompt for an anchor.
    pub fn for_anchor(&self, anchor: InterviewAnchor) -> &str {
        match anchor {
            InterviewAnchor::Problem => &self.problem,
            InterviewAnchor::Process => &self.process,
            InterviewAnchor::Priority => &self.priority,
        }
    }
}

/// `[collaborator]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollaboratorConfig {
    /// Bound on each model call, including one repair retry
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Answers are truncated to this many characters before entering a prompt
    #[serde(default = "default_max_answer_chars")]
    pub max_answer_chars: usize,
}

fn default_timeout_ms() -> u64 {
    8000
}

fn default_max_answer_chars() -> usize {
    4000
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_answer_chars: default_max_answer_chars(),
        }
    }
}

impl CollaboratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// `[llm]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmSection {
    pub provider: ProviderType,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment variable holding the API key; defaults per provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl LlmSection {
    /// Name of the environment variable the API key is read from.
    pub fn api_key_var(&self) -> &str {
        match &self.api_key_env {
            Some(var) => var,
            None => match self.provider {
                ProviderType::OpenAI => "OPENAI_API_KEY",
                ProviderType::Anthropic => "ANTHROPIC_API_KEY",
            },
        }
    }

    /// Build a provider config with the given API key.
    pub fn to_provider_config(&self, api_key: Option<String>) -> ProviderConfig {
        let defaults = ProviderConfig::default();
        ProviderConfig {
            provider: self.provider,
            api_key,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            options: defaults.options,
        }
    }

    /// Resolve the API key from the environment. `None` when unset or blank.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(self.api_key_var())
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> AppResult<()> {
        self.validate_quiz()?;
        self.validate_interview()?;
        self.validate_signals()?;

        if self.collaborator.timeout_ms == 0 {
            return Err(AppError::config("collaborator.timeout_ms must be greater than 0"));
        }
        if self.collaborator.max_answer_chars == 0 {
            return Err(AppError::config(
                "collaborator.max_answer_chars must be greater than 0",
            ));
        }

        if let Some(llm) = &self.llm {
            llm.to_provider_config(None)
                .validate()
                .map_err(|e| AppError::config(format!("llm: {}", e)))?;
        }

        Ok(())
    }

    fn validate_quiz(&self) -> AppResult<()> {
        if self.quiz.max_questions == 0 {
            return Err(AppError::config("quiz.max_questions must be at least 1"));
        }
        for category in ConfidenceCategory::all() {
            match self.quiz.thresholds.get(category) {
                None => {
                    return Err(AppError::config(format!(
                        "quiz.thresholds is missing {}",
                        category
                    )))
                }
                Some(t) if *t > 100 => {
                    return Err(AppError::config(format!(
                        "quiz.thresholds.{} must be within 0..=100, got {}",
                        category, t
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn validate_interview(&self) -> AppResult<()> {
        let interview = &self.interview;
        if interview.max_total_questions == 0 {
            return Err(AppError::config(
                "interview.max_total_questions must be at least 1",
            ));
        }
        if interview.anchor_threshold > 100 {
            return Err(AppError::config(format!(
                "interview.anchor_threshold must be within 0..=100, got {}",
                interview.anchor_threshold
            )));
        }
        let prompts = [
            ("problem", &interview.prompts.problem),
            ("process", &interview.prompts.process),
            ("priority", &interview.prompts.priority),
            ("wrap_up", &interview.prompts.wrap_up),
        ];
        for (name, prompt) in prompts {
            if prompt.trim().is_empty() {
                return Err(AppError::config(format!(
                    "interview.prompts.{} must not be empty",
                    name
                )));
            }
        }
        Ok(())
    }

    fn validate_signals(&self) -> AppResult<()> {
        let mut seen = HashSet::new();
        for rule in &self.signals {
            if !seen.insert(rule.signal) {
                return Err(AppError::config(format!(
                    "signal {} is configured more than once",
                    rule.signal
                )));
            }
            if rule.signal == SignalKind::VagueAnswer {
                if rule.min_words.is_none() {
                    return Err(AppError::config("signal vague_answer requires min_words"));
                }
            } else if !rule.patterns.iter().any(|p| !p.trim().is_empty()) {
                return Err(AppError::config(format!(
                    "signal {} requires at least one non-empty pattern",
                    rule.signal
                )));
            }
            if !rule.follow_ups.iter().any(|f| !f.trim().is_empty()) {
                return Err(AppError::config(format!(
                    "signal {} requires at least one follow-up",
                    rule.signal
                )));
            }
        }
        Ok(())
    }
}
