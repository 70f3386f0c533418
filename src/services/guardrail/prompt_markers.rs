//! Instruction-Marker Stripping
//!
//! Removes text that would read as instructions or structure once an answer
//! is embedded in a prompt: role prefixes, chat-template tokens, override
//! phrases, and code fences.

use regex::Regex;
use std::sync::OnceLock;

struct MarkerPattern {
    name: &'static str,
    regex: Regex,
}

fn marker_patterns() -> &'static Vec<MarkerPattern> {
    static PATTERNS: OnceLock<Vec<MarkerPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        MARKERS
            .iter()
            .filter_map(|(name, pattern)| {
                Regex::new(pattern)
                    .ok()
                    .map(|regex| MarkerPattern { name, regex })
            })
            .collect()
    })
}

const MARKERS: &[(&str, &str)] = &[
    ("chat_template_token", r"<\|[^|>]{0,64}\|>"),
    ("role_prefix", r"(?im)^\s*(system|assistant|user|developer)\s*:\s*"),
    (
        "instruction_override",
        r"(?i)\b(ignore|disregard|forget)\s+(all\s+|any\s+)?(the\s+)?(previous|prior|above|earlier)\s+(instructions|prompts|messages|rules)\b",
    ),
    ("code_fence", r"```[a-zA-Z0-9_-]*"),
];

/// Strip instruction-like markers. Returns the cleaned text and the names of
/// the marker kinds that were removed.
pub fn strip_markers(content: &str) -> (String, Vec<String>) {
    let mut cleaned = content.to_string();
    let mut stripped = Vec::new();

    for marker in marker_patterns() {
        if marker.regex.is_match(&cleaned) {
            stripped.push(marker.name.to_string());
            cleaned = marker.regex.replace_all(&cleaned, "").to_string();
        }
    }

    (cleaned, stripped)
}
