//! Text Helpers
//!
//! Small string utilities shared by the detector, the guardrail, and the
//! model-response parsers.

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Truncate to at most `max_chars` characters, never splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Extract a JSON object from model output, handling markdown fences and
/// surrounding prose.
pub fn extract_json_object(response_text: &str) -> String {
    let trimmed = response_text.trim();

    // Try markdown code fences
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim().to_string();
        }
    }

    // Try to find the first { and last } for a JSON object
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start <= end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

/// Build the retry prompt sent after an unparseable model response.
pub fn build_repair_prompt(original_response: &str, parse_error: &str) -> String {
    format!(
        "Your previous response could not be parsed as valid JSON.\n\n\
         Parse error: {}\n\n\
         Your previous response was:\n{}\n\n\
         Please respond with ONLY a valid JSON object matching the schema. \
         No markdown fences, no explanatory text. Just the raw JSON object \
         starting with {{ and ending with }}.",
        parse_error,
        truncate_chars(original_response, 2000)
    )
}
