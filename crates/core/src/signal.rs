//! Answer Signals
//!
//! A signal is a named pattern detected in one free-text answer. Signals are
//! derived per answer and never persisted on their own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The closed set of signals the detector and the analyzer can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Strong negative emotion about a problem
    PainIntensity,
    /// Work done by hand that could be automated
    ManualWork,
    /// The problem reaches the business's customers
    CustomerImpact,
    /// The problem caps revenue or scale
    GrowthBlocker,
    /// Hours or days lost to the problem
    TimeCost,
    /// Answer too short to learn anything from
    VagueAnswer,
}

impl SignalKind {
    /// Every signal, in declaration order.
    pub fn all() -> &'static [SignalKind] {
        &[
            SignalKind::PainIntensity,
            SignalKind::ManualWork,
            SignalKind::CustomerImpact,
            SignalKind::GrowthBlocker,
            SignalKind::TimeCost,
            SignalKind::VagueAnswer,
        ]
    }

    /// Stable snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::PainIntensity => "pain_intensity",
            SignalKind::ManualWork => "manual_work",
            SignalKind::CustomerImpact => "customer_impact",
            SignalKind::GrowthBlocker => "growth_blocker",
            SignalKind::TimeCost => "time_cost",
            SignalKind::VagueAnswer => "vague_answer",
        }
    }

    /// Whether this signal says something about answer quality rather than content.
    pub fn is_quality_signal(&self) -> bool {
        matches!(self, SignalKind::VagueAnswer)
    }

    /// Parse the snake_case identifier.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::all().iter().copied().find(|k| k.as_str() == needle)
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::parse(format!("unknown signal: {}", s)))
    }
}
