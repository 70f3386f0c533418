//! Deterministic Analysis
//!
//! Builds an [`AnswerAnalysis`] from signal detection alone. Used whenever
//! the model analyzer is unavailable, slow, or returns garbage. Identical
//! inputs always produce identical output.

use std::collections::BTreeMap;

use elicit_core::{Category, ConfidenceCategory, SignalKind};

use super::types::{AnalyzedFact, AnswerAnalysis, Sentiment};
use crate::services::confidence::{FactConfidence, MAX_ANSWER_BOOST};
use crate::services::signals::SignalDetection;
use crate::utils::text::truncate_chars;

pub const PRIMARY_BOOST: u32 = 30;
pub const VAGUE_PRIMARY_BOOST: u32 = 15;
pub const SECONDARY_BOOST: u32 = 10;
pub const SIGNAL_BONUS: u32 = 5;
pub const FACT_VALUE_MAX_CHARS: usize = 280;

impl AnswerAnalysis {
    /// Derive an analysis for an answer to a question targeting `primary`
    /// (and optionally `secondary`).
    pub fn from_detection(
        detection: &SignalDetection,
        answer: &str,
        primary: ConfidenceCategory,
        secondary: &[ConfidenceCategory],
    ) -> Self {
        let vague = detection.is_vague();
        let content_signals = detection.content_signal_count() as u32;

        let mut confidence_boosts = BTreeMap::new();
        let base = if vague {
            VAGUE_PRIMARY_BOOST
        } else {
            PRIMARY_BOOST
        };
        let primary_boost = (base + SIGNAL_BONUS * content_signals).min(MAX_ANSWER_BOOST);
        confidence_boosts.insert(primary, primary_boost);
        if !vague {
            for category in secondary.iter().filter(|c| **c != primary) {
                confidence_boosts.insert(*category, SECONDARY_BOOST);
            }
        }

        let confidence = if vague {
            FactConfidence::Low
        } else if detection.signals.len() >= 2 {
            FactConfidence::High
        } else {
            FactConfidence::Medium
        };

        let value = truncate_chars(answer.trim(), FACT_VALUE_MAX_CHARS).to_string();
        let extracted_facts = if value.is_empty() {
            Vec::new()
        } else {
            vec![AnalyzedFact {
                category: primary,
                label: primary.label().to_string(),
                value,
                confidence,
            }]
        };

        let sentiment = if detection.has(SignalKind::PainIntensity) {
            Sentiment::Frustrated
        } else if detection.has(SignalKind::GrowthBlocker) {
            Sentiment::Enthusiastic
        } else {
            Sentiment::Neutral
        };

        AnswerAnalysis {
            extracted_facts,
            confidence_boosts,
            detected_signals: detection.kinds(),
            should_deep_dive: detection.should_probe_deeper,
            deep_dive_topic: None,
            sentiment,
        }
    }
}
