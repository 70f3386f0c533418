//! Prompt-Input Guardrail
//!
//! Every answer passes through [`sanitize_answer`] before it appears in a
//! model prompt. The signal detector always sees the raw text instead.
//!
//! ## Pipeline
//!
//! 1. Redact secrets to `[REDACTED:<name>]`
//! 2. Strip instruction-like markers
//! 3. Drop control characters except newline and tab
//! 4. Escape `<` and `>` so the answer cannot close its `<answer>` wrapper
//! 5. Truncate to the configured length

pub mod prompt_markers;
pub mod sensitive_data;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::text::truncate_chars;

pub use prompt_markers::strip_markers;
pub use sensitive_data::redact_secrets;

/// An answer that is safe to embed in a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedAnswer {
    pub text: String,
    /// Names of secret patterns that were redacted
    pub redacted_items: Vec<String>,
    /// Names of marker kinds that were stripped
    pub stripped_markers: Vec<String>,
}

impl SanitizedAnswer {
    pub fn was_modified(&self) -> bool {
        !self.redacted_items.is_empty() || !self.stripped_markers.is_empty()
    }
}

/// Sanitize a raw answer for inclusion in a model prompt.
pub fn sanitize_answer(raw: &str, max_chars: usize) -> SanitizedAnswer {
    let (redacted, redacted_items) = redact_secrets(raw);
    let (stripped, stripped_markers) = strip_markers(&redacted);

    let cleaned: String = stripped
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .replace('<', "&lt;")
        .replace('>', "&gt;");

    let text = truncate_chars(cleaned.trim(), max_chars).to_string();

    if !redacted_items.is_empty() || !stripped_markers.is_empty() {
        debug!(
            redacted = ?redacted_items,
            stripped = ?stripped_markers,
            "Sanitized answer before prompting"
        );
    }

    SanitizedAnswer {
        text,
        redacted_items,
        stripped_markers,
    }
}
