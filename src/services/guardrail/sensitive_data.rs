//! Sensitive Data Redaction
//!
//! Redacts API keys, passwords, and secret assignments that an owner pastes
//! into an answer, before the answer reaches a model prompt.
//! Uses compiled regex patterns for performance.

use regex::Regex;
use std::sync::OnceLock;

/// A named secret pattern.
struct CompiledPattern {
    name: &'static str,
    regex: Regex,
}

/// Get compiled patterns (initialized once).
fn secret_patterns() -> &'static Vec<CompiledPattern> {
    static PATTERNS: OnceLock<Vec<CompiledPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SECRET_PATTERNS
            .iter()
            .filter_map(|(name, pattern)| {
                Regex::new(pattern)
                    .ok()
                    .map(|regex| CompiledPattern { name, regex })
            })
            .collect()
    })
}

/// (name, regex) pairs. Email addresses are not secrets and are kept.
const SECRET_PATTERNS: &[(&str, &str)] = &[
    ("OpenAI API Key", r"sk-[a-zA-Z0-9_\-]{20,}"),
    ("AWS Access Key", r"AKIA[0-9A-Z]{16}"),
    ("GitHub PAT", r"ghp_[a-zA-Z0-9]{36,}"),
    ("Slack Token", r"xox[bps]-[a-zA-Z0-9\-]+"),
    ("Stripe Key", r"(?:sk|pk|rk)_live_[a-zA-Z0-9]{16,}"),
    (
        "Password Assignment",
        r#"(?i)\b(password|passwd|pwd|secret|token|api[_-]?key)\s*(?:is\s*)?[=:]\s*["']?[^\s"']{4,}"#,
    ),
    ("AWS_SECRET_ACCESS_KEY", r"(?i)AWS_SECRET_ACCESS_KEY\s*=\s*\S+"),
    ("DATABASE_URL", r"(?i)DATABASE_URL\s*=\s*\S+"),
];

/// Replace every secret with `[REDACTED:<name>]`. Returns the redacted text
/// and the names of the patterns that fired.
pub fn redact_secrets(content: &str) -> (String, Vec<String>) {
    let mut redacted = content.to_string();
    let mut redacted_items = Vec::new();

    for pattern in secret_patterns() {
        if pattern.regex.is_match(&redacted) {
            redacted_items.push(pattern.name.to_string());
            redacted = pattern
                .regex
                .replace_all(&redacted, format!("[REDACTED:{}]", pattern.name))
                .to_string();
        }
    }

    (redacted, redacted_items)
}
