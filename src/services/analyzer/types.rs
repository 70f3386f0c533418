//! Answer Analysis Types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use elicit_core::{ConfidenceCategory, SignalKind};

use crate::services::confidence::FactConfidence;

/// Emotional tone of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Frustrated,
    #[default]
    Neutral,
    Enthusiastic,
}

impl Sentiment {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "frustrated" => Some(Sentiment::Frustrated),
            "neutral" => Some(Sentiment::Neutral),
            "enthusiastic" => Some(Sentiment::Enthusiastic),
            _ => None,
        }
    }
}

/// A fact the analysis attributes to a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedFact {
    pub category: ConfidenceCategory,
    pub label: String,
    pub value: String,
    pub confidence: FactConfidence,
}

/// Structured reading of one answer. Consumed once by the quiz, then dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerAnalysis {
    pub extracted_facts: Vec<AnalyzedFact>,
    /// Points per category, each within 0..=`MAX_ANSWER_BOOST`
    pub confidence_boosts: BTreeMap<ConfidenceCategory, u32>,
    pub detected_signals: Vec<SignalKind>,
    pub should_deep_dive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_dive_topic: Option<String>,
    pub sentiment: Sentiment,
}

impl AnswerAnalysis {
    pub fn boost_for(&self, category: ConfidenceCategory) -> u32 {
        self.confidence_boosts.get(&category).copied().unwrap_or(0)
    }

    pub fn signal_names(&self) -> Vec<String> {
        self.detected_signals.iter().map(|s| s.to_string()).collect()
    }
}
