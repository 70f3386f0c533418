//! Confidence Tracker
//!
//! Per-session scores, thresholds, extracted facts, and gap computation.
//! Every mutation recomputes the gap list before returning, so `ready` is
//! never read stale.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use elicit_core::Category;

/// Scores never exceed this value.
pub const MAX_SCORE: u32 = 100;

/// Any single boost from an analysis or a seed is capped to this value.
pub const MAX_ANSWER_BOOST: u32 = 40;

/// How sure the engine is about an extracted fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactConfidence {
    High,
    Medium,
    Low,
}

impl FactConfidence {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(FactConfidence::High),
            "medium" => Some(FactConfidence::Medium),
            "low" => Some(FactConfidence::Low),
            _ => None,
        }
    }
}

/// Where a fact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactSource {
    PriorResearch,
    AnswerExtraction,
}

/// One immutable piece of extracted information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFact {
    pub label: String,
    pub value: String,
    pub confidence_level: FactConfidence,
    pub source: FactSource,
    pub extracted_at: DateTime<Utc>,
}

impl ExtractedFact {
    pub fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        confidence_level: FactConfidence,
        source: FactSource,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            confidence_level,
            source,
            extracted_at: Utc::now(),
        }
    }
}

/// Mutable confidence aggregate for one session.
///
/// The tracked category set is the key set of the thresholds. Touching a
/// category outside that set is a programmer error and panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    bound(serialize = "C: Category", deserialize = "C: Category"),
    from = "PersistedConfidence<C>"
)]
pub struct ConfidenceState<C: Category> {
    thresholds: BTreeMap<C, u32>,
    scores: BTreeMap<C, u32>,
    facts: BTreeMap<C, Vec<ExtractedFact>>,
    gaps: Vec<C>,
    ready: bool,
    questions_asked: u32,
}

/// Wire form accepted on resume; gaps and readiness are always recomputed.
#[derive(Deserialize)]
#[serde(bound(deserialize = "C: Category"))]
struct PersistedConfidence<C: Category> {
    thresholds: BTreeMap<C, u32>,
    #[serde(default)]
    scores: BTreeMap<C, u32>,
    #[serde(default)]
    facts: BTreeMap<C, Vec<ExtractedFact>>,
    #[serde(default)]
    questions_asked: u32,
}

impl<C: Category> From<PersistedConfidence<C>> for ConfidenceState<C> {
    fn from(persisted: PersistedConfidence<C>) -> Self {
        let mut state = ConfidenceState::new(persisted.thresholds);
        for (category, score) in persisted.scores {
            if state.tracks(category) {
                state.scores.insert(category, score.min(MAX_SCORE));
            }
        }
        for (category, facts) in persisted.facts {
            if state.tracks(category) {
                state.facts.insert(category, facts);
            }
        }
        state.questions_asked = persisted.questions_asked;
        state.recompute_gaps();
        state
    }
}

impl<C: Category> ConfidenceState<C> {
    /// Create a state with every tracked category at score 0.
    pub fn new(thresholds: BTreeMap<C, u32>) -> Self {
        let thresholds: BTreeMap<C, u32> = thresholds
            .into_iter()
            .map(|(c, t)| (c, t.min(MAX_SCORE)))
            .collect();
        let scores = thresholds.keys().map(|c| (*c, 0)).collect();
        let facts = thresholds.keys().map(|c| (*c, Vec::new())).collect();
        let mut state = Self {
            thresholds,
            scores,
            facts,
            gaps: Vec::new(),
            ready: false,
            questions_asked: 0,
        };
        state.recompute_gaps();
        state
    }

    /// Whether the category is part of this state's category set.
    pub fn tracks(&self, category: C) -> bool {
        self.thresholds.contains_key(&category)
    }

    fn assert_tracked(&self, category: C) {
        assert!(
            self.tracks(category),
            "category {} is not tracked by this confidence state",
            category
        );
    }

    /// Tracked categories in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = C> + '_ {
        self.thresholds.keys().copied()
    }

    pub fn threshold(&self, category: C) -> u32 {
        self.assert_tracked(category);
        self.thresholds.get(&category).copied().unwrap_or_default()
    }

    pub fn score(&self, category: C) -> u32 {
        self.assert_tracked(category);
        self.scores.get(&category).copied().unwrap_or_default()
    }

    /// Points still missing before the category stops being a gap.
    pub fn deficit(&self, category: C) -> u32 {
        self.threshold(category).saturating_sub(self.score(category))
    }

    /// Add `delta` to a category's score, clamped at [`MAX_SCORE`].
    /// Returns the new score.
    pub fn update_score(&mut self, category: C, delta: u32) -> u32 {
        self.assert_tracked(category);
        let score = self.scores.entry(category).or_insert(0);
        *score = score.saturating_add(delta).min(MAX_SCORE);
        let updated = *score;
        self.recompute_gaps();
        updated
    }

    /// Apply an answer- or seed-derived boost, capped at [`MAX_ANSWER_BOOST`].
    pub fn apply_boost(&mut self, category: C, boost: u32) -> u32 {
        self.update_score(category, boost.min(MAX_ANSWER_BOOST))
    }

    /// Append a fact to a category.
    pub fn add_fact(&mut self, category: C, fact: ExtractedFact) {
        self.assert_tracked(category);
        self.facts.entry(category).or_default().push(fact);
    }

    pub fn facts(&self, category: C) -> &[ExtractedFact] {
        self.facts
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn facts_collected(&self) -> usize {
        self.facts.values().map(Vec::len).sum()
    }

    /// Recompute the gap list and readiness from the current scores.
    pub fn recompute_gaps(&mut self) {
        self.gaps = self
            .thresholds
            .iter()
            .filter(|(c, t)| self.scores.get(*c).copied().unwrap_or_default() < **t)
            .map(|(c, _)| *c)
            .collect();
        self.ready = self.gaps.is_empty();
    }

    /// Gaps in declaration order.
    pub fn gaps(&self) -> &[C] {
        &self.gaps
    }

    /// Gaps ordered worst deficit first; ties keep declaration order.
    pub fn sorted_gaps(&self) -> Vec<C> {
        let mut gaps = self.gaps.clone();
        // Stable sort over declaration-ordered gaps keeps ties deterministic
        gaps.sort_by(|a, b| self.deficit(*b).cmp(&self.deficit(*a)));
        gaps
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn questions_asked(&self) -> u32 {
        self.questions_asked
    }

    pub fn record_question(&mut self) -> u32 {
        self.questions_asked = self.questions_asked.saturating_add(1);
        self.questions_asked
    }

    /// Mean of per-category completion, as a percentage.
    pub fn overall_percent(&self) -> u32 {
        let ratios: Vec<f64> = self
            .thresholds
            .iter()
            .filter(|(_, t)| **t > 0)
            .map(|(c, t)| {
                let score = self.scores.get(c).copied().unwrap_or_default();
                (score as f64 / *t as f64).min(1.0)
            })
            .collect();
        if ratios.is_empty() {
            return 100;
        }
        let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
        (mean * 100.0).floor() as u32
    }

    /// Progress summary handed to callers and the report pipeline.
    pub fn snapshot(&self) -> ProgressSnapshot<C> {
        let categories = self
            .categories()
            .map(|category| {
                let score = self.score(category);
                let threshold = self.threshold(category);
                CategoryProgress {
                    category,
                    label: category.label().to_string(),
                    score,
                    threshold,
                    deficit: threshold.saturating_sub(score),
                    is_gap: score < threshold,
                }
            })
            .collect();

        ProgressSnapshot {
            categories,
            gaps: self.sorted_gaps(),
            questions_asked: self.questions_asked,
            ready: self.ready,
            facts: self.facts.clone(),
            facts_collected: self.facts_collected(),
            overall_percent: self.overall_percent(),
        }
    }
}

/// One row of a [`ProgressSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "C: Category", deserialize = "C: Category"))]
pub struct CategoryProgress<C: Category> {
    pub category: C,
    pub label: String,
    pub score: u32,
    pub threshold: u32,
    pub deficit: u32,
    pub is_gap: bool,
}

/// Read-only view of a [`ConfidenceState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "C: Category", deserialize = "C: Category"))]
pub struct ProgressSnapshot<C: Category> {
    /// Per-category rows in declaration order
    pub categories: Vec<CategoryProgress<C>>,
    /// Gaps, worst deficit first
    pub gaps: Vec<C>,
    pub questions_asked: u32,
    pub ready: bool,
    pub facts: BTreeMap<C, Vec<ExtractedFact>>,
    pub facts_collected: usize,
    pub overall_percent: u32,
}
