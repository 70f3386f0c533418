//! Confidence Categories
//!
//! A category is a topic bucket the engine must gather enough information
//! about before a session is done. Quiz mode tracks eight
//! [`ConfidenceCategory`] values; voice-interview mode tracks the three
//! [`InterviewAnchor`] topics. Both implement [`Category`] so the confidence
//! tracker can be written once.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A closed, ordered set of topic categories.
///
/// `Ord` must follow declaration order: it is the tie-breaker whenever two
/// categories have the same deficit.
pub trait Category:
    Copy
    + Eq
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Display
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Every value, in declaration order.
    fn all() -> &'static [Self];

    /// Stable snake_case identifier used in config files and model output.
    fn as_str(&self) -> &'static str;

    /// Human-readable label for prompts and reports.
    fn label(&self) -> &'static str;

    /// Parse the snake_case identifier.
    fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::all().iter().copied().find(|c| c.as_str() == needle)
    }
}

/// Quiz-mode topic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceCategory {
    /// Name, size, what the company does
    CompanyBasics,
    /// Software and systems in use today
    TechStack,
    /// Problems hurting the business
    PainPoints,
    /// How work actually gets done day to day
    Operations,
    /// What the owner wants to achieve and in what order
    GoalsPriorities,
    /// Hours, costs, volumes, error rates
    QuantifiableMetrics,
    /// Market, regulation, competitors
    IndustryContext,
    /// Budget, timeline, decision makers
    BuyingSignals,
}

impl ConfidenceCategory {
    const ALL: [ConfidenceCategory; 8] = [
        ConfidenceCategory::CompanyBasics,
        ConfidenceCategory::TechStack,
        ConfidenceCategory::PainPoints,
        ConfidenceCategory::Operations,
        ConfidenceCategory::GoalsPriorities,
        ConfidenceCategory::QuantifiableMetrics,
        ConfidenceCategory::IndustryContext,
        ConfidenceCategory::BuyingSignals,
    ];

    /// Documented default threshold for this category.
    pub fn default_threshold(&self) -> u32 {
        match self {
            ConfidenceCategory::CompanyBasics => 70,
            ConfidenceCategory::TechStack => 60,
            ConfidenceCategory::PainPoints => 80,
            ConfidenceCategory::Operations => 60,
            ConfidenceCategory::GoalsPriorities => 75,
            ConfidenceCategory::QuantifiableMetrics => 50,
            ConfidenceCategory::IndustryContext => 50,
            ConfidenceCategory::BuyingSignals => 40,
        }
    }
}

impl Category for ConfidenceCategory {
    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn as_str(&self) -> &'static str {
        match self {
            ConfidenceCategory::CompanyBasics => "company_basics",
            ConfidenceCategory::TechStack => "tech_stack",
            ConfidenceCategory::PainPoints => "pain_points",
            ConfidenceCategory::Operations => "operations",
            ConfidenceCategory::GoalsPriorities => "goals_priorities",
            ConfidenceCategory::QuantifiableMetrics => "quantifiable_metrics",
            ConfidenceCategory::IndustryContext => "industry_context",
            ConfidenceCategory::BuyingSignals => "buying_signals",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ConfidenceCategory::CompanyBasics => "Company basics",
            ConfidenceCategory::TechStack => "Tech stack",
            ConfidenceCategory::PainPoints => "Pain points",
            ConfidenceCategory::Operations => "Operations",
            ConfidenceCategory::GoalsPriorities => "Goals and priorities",
            ConfidenceCategory::QuantifiableMetrics => "Quantifiable metrics",
            ConfidenceCategory::IndustryContext => "Industry context",
            ConfidenceCategory::BuyingSignals => "Buying signals",
        }
    }
}

impl fmt::Display for ConfidenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as Category>::parse(s)
            .ok_or_else(|| CoreError::parse(format!("unknown confidence category: {}", s)))
    }
}

/// Voice-interview anchor topics, asked in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewAnchor {
    /// Anchor 1: what is going wrong
    Problem,
    /// Anchor 2: how the work is done today
    Process,
    /// Anchor 3: what matters most to fix
    Priority,
}

impl InterviewAnchor {
    const ALL: [InterviewAnchor; 3] = [
        InterviewAnchor::Problem,
        InterviewAnchor::Process,
        InterviewAnchor::Priority,
    ];

    /// 1-based anchor number.
    pub fn number(&self) -> u8 {
        match self {
            InterviewAnchor::Problem => 1,
            InterviewAnchor::Process => 2,
            InterviewAnchor::Priority => 3,
        }
    }

    /// Anchor for a 1-based number.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(InterviewAnchor::Problem),
            2 => Some(InterviewAnchor::Process),
            3 => Some(InterviewAnchor::Priority),
            _ => None,
        }
    }

    /// The anchor after this one, `None` after Priority.
    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// Whether this is the final anchor.
    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl Category for InterviewAnchor {
    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn as_str(&self) -> &'static str {
        match self {
            InterviewAnchor::Problem => "problem",
            InterviewAnchor::Process => "process",
            InterviewAnchor::Priority => "priority",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            InterviewAnchor::Problem => "Problem",
            InterviewAnchor::Process => "Process",
            InterviewAnchor::Priority => "Priority",
        }
    }
}

impl fmt::Display for InterviewAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewAnchor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as Category>::parse(s)
            .ok_or_else(|| CoreError::parse(format!("unknown interview anchor: {}", s)))
    }
}
