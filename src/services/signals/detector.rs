//! Signal Detector
//!
//! Deterministic, local pattern analysis of one free-text answer. Never fails
//! and never blocks: any input, including the empty string, yields a valid
//! detection. Every model-backed path in the engine falls back to this.

use serde::{Deserialize, Serialize};
use tracing::debug;

use elicit_core::SignalKind;

use crate::models::SignalRule;
use crate::utils::text::word_count;

/// Confidence assigned to a length-rule hit.
pub const LENGTH_RULE_CONFIDENCE: f64 = 0.9;
/// Base confidence for a pattern-rule hit.
pub const PATTERN_BASE_CONFIDENCE: f64 = 0.5;
/// Confidence added per matched pattern.
pub const PATTERN_STEP_CONFIDENCE: f64 = 0.2;
/// Maximum number of suggested follow-ups per detection.
pub const MAX_SUGGESTED_FOLLOW_UPS: usize = 2;

/// A signal rule with patterns pre-lowercased.
#[derive(Debug, Clone)]
struct CompiledRule {
    signal: SignalKind,
    patterns: Vec<String>,
    min_words: Option<usize>,
    follow_ups: Vec<String>,
}

/// One fired signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSignal {
    pub kind: SignalKind,
    pub confidence: f64,
    /// Configured patterns that matched, empty for length rules
    pub matched_patterns: Vec<String>,
    /// First configured follow-up for this signal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
}

/// Result of analyzing one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDetection {
    pub word_count: usize,
    /// Fired signals in bank order
    pub signals: Vec<DetectedSignal>,
    pub should_probe_deeper: bool,
    /// At most [`MAX_SUGGESTED_FOLLOW_UPS`], in bank order
    pub suggested_follow_ups: Vec<String>,
}

impl SignalDetection {
    pub fn has(&self, kind: SignalKind) -> bool {
        self.signals.iter().any(|s| s.kind == kind)
    }

    pub fn is_vague(&self) -> bool {
        self.has(SignalKind::VagueAnswer)
    }

    pub fn kinds(&self) -> Vec<SignalKind> {
        self.signals.iter().map(|s| s.kind).collect()
    }

    /// Signal names as strings, for turn results.
    pub fn names(&self) -> Vec<String> {
        self.signals.iter().map(|s| s.kind.to_string()).collect()
    }

    /// Number of fired signals that say something about content.
    pub fn content_signal_count(&self) -> usize {
        self.signals.iter().filter(|s| !s.kind.is_quality_signal()).count()
    }

    /// Highest-confidence signal; ties go to the earlier bank entry.
    pub fn dominant(&self) -> Option<&DetectedSignal> {
        self.signals.iter().fold(None, |best: Option<&DetectedSignal>, s| match best {
            Some(b) if b.confidence >= s.confidence => Some(b),
            _ => Some(s),
        })
    }
}

/// Compiled signal bank.
#[derive(Debug, Clone)]
pub struct SignalDetector {
    rules: Vec<CompiledRule>,
}

impl SignalDetector {
    pub fn new(bank: &[SignalRule]) -> Self {
        let rules = bank
            .iter()
            .map(|rule| CompiledRule {
                signal: rule.signal,
                patterns: rule
                    .patterns
                    .iter()
                    .map(|p| p.trim().to_lowercase())
                    .filter(|p| !p.is_empty())
                    .collect(),
                min_words: rule.min_words,
                follow_ups: rule
                    .follow_ups
                    .iter()
                    .filter(|f| !f.trim().is_empty())
                    .cloned()
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    /// Follow-up prompts configured for a signal.
    pub fn follow_ups_for(&self, kind: SignalKind) -> &[String] {
        self.rules
            .iter()
            .find(|r| r.signal == kind)
            .map(|r| r.follow_ups.as_slice())
            .unwrap_or_default()
    }

    /// Analyze one answer.
    pub fn detect(&self, answer: &str) -> SignalDetection {
        let words = word_count(answer);
        let lowered = answer.to_lowercase();
        let mut signals = Vec::new();

        for rule in &self.rules {
            let length_hit = rule.min_words.is_some_and(|min| words < min);
            let matched: Vec<String> = rule
                .patterns
                .iter()
                .filter(|p| lowered.contains(p.as_str()))
                .cloned()
                .collect();

            let confidence = if length_hit {
                LENGTH_RULE_CONFIDENCE
            } else if !matched.is_empty() {
                (PATTERN_BASE_CONFIDENCE + PATTERN_STEP_CONFIDENCE * matched.len() as f64).min(1.0)
            } else {
                continue;
            };

            signals.push(DetectedSignal {
                kind: rule.signal,
                confidence,
                matched_patterns: matched,
                follow_up: rule.follow_ups.first().cloned(),
            });
        }

        let should_probe_deeper =
            signals.is_empty() || signals.iter().any(|s| s.kind == SignalKind::VagueAnswer);
        let suggested_follow_ups = signals
            .iter()
            .filter_map(|s| s.follow_up.clone())
            .take(MAX_SUGGESTED_FOLLOW_UPS)
            .collect();

        let detection = SignalDetection {
            word_count: words,
            signals,
            should_probe_deeper,
            suggested_follow_ups,
        };
        debug!(
            word_count = detection.word_count,
            signals = ?detection.kinds(),
            should_probe_deeper = detection.should_probe_deeper,
            "Signals detected"
        );
        detection
    }
}
