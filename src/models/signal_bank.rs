//! Signal Bank
//!
//! The configured list of signal rules, in declaration order. Order matters:
//! it decides which follow-ups are suggested first and breaks ties when
//! picking the dominant signal.

use serde::{Deserialize, Serialize};

use elicit_core::SignalKind;

/// One configured signal rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalRule {
    /// Which signal this rule emits
    #[serde(rename = "name")]
    pub signal: SignalKind,
    /// Case-insensitive substrings; the rule fires when at least one matches
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Length rule: fires when the answer has fewer words than this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_words: Option<usize>,
    /// Follow-up prompts, first one is suggested
    #[serde(default)]
    pub follow_ups: Vec<String>,
}

impl SignalRule {
    fn keywords(signal: SignalKind, patterns: &[&str], follow_ups: &[&str]) -> Self {
        Self {
            signal,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            min_words: None,
            follow_ups: follow_ups.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// The built-in signal bank.
pub fn default_signal_bank() -> Vec<SignalRule> {
    vec![
        SignalRule {
            signal: SignalKind::VagueAnswer,
            patterns: Vec::new(),
            min_words: Some(5),
            follow_ups: vec![
                "Could you say a bit more about that? What does it look like on a typical day?"
                    .to_string(),
                "Can you give me a specific example of when that happened recently?".to_string(),
            ],
        },
        SignalRule::keywords(
            SignalKind::PainIntensity,
            &[
                "frustrat",
                "nightmare",
                "i hate",
                "painful",
                "killing us",
                "drives me crazy",
                "stressful",
                "exhausting",
                "fed up",
                "headache",
            ],
            &[
                "What part of that is the most frustrating for you?",
                "How long has that been going on?",
            ],
        ),
        SignalRule::keywords(
            SignalKind::ManualWork,
            &[
                "manual",
                "by hand",
                "spreadsheet",
                "excel",
                "copy and paste",
                "copy-paste",
                "re-enter",
                "retype",
                "paperwork",
                "double entry",
            ],
            &[
                "Which of those manual steps takes the most time each week?",
                "Who on your team ends up doing that work?",
            ],
        ),
        SignalRule::keywords(
            SignalKind::CustomerImpact,
            &[
                "customer",
                "client",
                "complain",
                "churn",
                "refund",
                "bad review",
                "lost deal",
                "patient",
            ],
            &[
                "How does that show up for your customers?",
                "Have you lost any business because of it?",
            ],
        ),
        SignalRule::keywords(
            SignalKind::GrowthBlocker,
            &[
                "can't scale",
                "cannot scale",
                "growth",
                "bottleneck",
                "hiring",
                "capacity",
                "turn away",
                "holding us back",
                "expand",
            ],
            &[
                "What would change if that bottleneck disappeared tomorrow?",
                "How much more work could you take on if this were solved?",
            ],
        ),
        SignalRule::keywords(
            SignalKind::TimeCost,
            &[
                "hours",
                "every day",
                "every week",
                "all day",
                "takes forever",
                "weekend",
                "overtime",
                "late night",
                "wasted",
            ],
            &[
                "Roughly how many hours a week go into that?",
                "What would your team do with that time back?",
            ],
        ),
    ]
}
