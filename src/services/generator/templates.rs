//! Template Text
//!
//! Fixed acknowledgments and questions used when the model is unavailable.
//! Pure functions of their inputs.

use elicit_core::{Category, ConfidenceCategory, SignalKind};

use crate::services::signals::SignalDetection;

/// Acknowledgment used when no signal fired.
pub const NEUTRAL_ACKNOWLEDGMENT: &str = "Thanks, that's helpful.";

/// Acknowledgment keyed by signal.
pub fn acknowledgment_for(signal: Option<SignalKind>) -> &'static str {
    match signal {
        Some(SignalKind::PainIntensity) => "That sounds genuinely frustrating.",
        Some(SignalKind::ManualWork) => "Doing that by hand really adds up.",
        Some(SignalKind::CustomerImpact) => "When customers feel it, it matters even more.",
        Some(SignalKind::GrowthBlocker) => "That makes sense, it's clearly holding growth back.",
        Some(SignalKind::TimeCost) => "That's a lot of time to lose.",
        Some(SignalKind::VagueAnswer) => "Got it.",
        None => NEUTRAL_ACKNOWLEDGMENT,
    }
}

/// Acknowledgment keyed by the dominant signal of a detection.
pub fn template_acknowledgment(detection: &SignalDetection) -> &'static str {
    acknowledgment_for(detection.dominant().map(|s| s.kind))
}

/// The fixed question for a quiz category.
pub fn category_question(category: ConfidenceCategory) -> &'static str {
    match category {
        ConfidenceCategory::CompanyBasics => {
            "Tell me a little about your business. What do you do, and how many people are on the team?"
        }
        ConfidenceCategory::TechStack => {
            "What software or tools does your team rely on day to day?"
        }
        ConfidenceCategory::PainPoints => {
            "What's the most frustrating part of running the business right now?"
        }
        ConfidenceCategory::Operations => {
            "How does a typical week run, from the first customer request to the last task of the day?"
        }
        ConfidenceCategory::GoalsPriorities => {
            "What are you hoping to achieve over the next year, and which of those matters most?"
        }
        ConfidenceCategory::QuantifiableMetrics => {
            "Roughly how many hours a week go into admin or repetitive work, and what does that cost you?"
        }
        ConfidenceCategory::IndustryContext => {
            "What's happening in your industry right now that affects how you work?"
        }
        ConfidenceCategory::BuyingSignals => {
            "If you found the right solution, what budget and timeline would you be working with?"
        }
    }
}

/// Build the fallback question for a target, optionally inviting the owner
/// to cover secondary categories and leading with a deep-dive topic.
pub fn fallback_question(
    target: ConfidenceCategory,
    secondary: &[ConfidenceCategory],
    deep_dive_topic: Option<&str>,
) -> String {
    let mut question = String::new();
    if let Some(topic) = deep_dive_topic.map(str::trim).filter(|t| !t.is_empty()) {
        question.push_str(&format!("You mentioned {}. ", topic));
    }
    question.push_str(category_question(target));

    let labels: Vec<String> = secondary
        .iter()
        .filter(|c| **c != target)
        .take(2)
        .map(|c| c.label().to_lowercase())
        .collect();
    match labels.as_slice() {
        [] => {}
        [one] => question.push_str(&format!(" Feel free to touch on {} too.", one)),
        [first, second, ..] => question.push_str(&format!(
            " Feel free to touch on {} and {} too.",
            first, second
        )),
    }
    question
}
