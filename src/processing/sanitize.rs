//! Helpers for normalizing request input and generated text.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

use super::types::{QuestionError, QuestionType};

/// Collapse every run of whitespace to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse requested type identifiers, rejecting unknown ones and dropping repeats in order.
pub fn parse_question_types(values: &[String]) -> Result<Vec<QuestionType>, QuestionError> {
    let mut seen = HashSet::new();
    let mut parsed = Vec::new();
    for value in values {
        if value.trim().is_empty() {
            continue;
        }
        let kind: QuestionType = value.parse()?;
        if seen.insert(kind) {
            parsed.push(kind);
        }
    }
    Ok(parsed)
}

/// Trim a filename and strip path components, falling back to a placeholder when empty.
pub fn sanitize_filename(value: Option<String>) -> String {
    value
        .as_deref()
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or(name).trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "document.pdf".into())
}

/// Hex-encoded SHA-256 of the given text.
pub(crate) fn compute_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Cut `text` to at most `max_chars` characters, marking the cut with an ellipsis.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>()
        .trim_end()
        .to_string();
    truncated.push('…');
    truncated
}

/// Append `terminator` unless the text already ends in `.`, `?` or `!`.
pub(crate) fn ensure_terminated(text: &str, terminator: char) -> String {
    let trimmed = text.trim_end();
    if trimmed.ends_with(['.', '?', '!']) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{terminator}")
    }
}

/// Lower-case the first character so a sentence can follow a prefix.
///
/// Words whose second character is upper-case (acronyms such as `DNA`) are left untouched.
pub(crate) fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if !second.is_uppercase() => {
            first.to_lowercase().chain(text[first.len_utf8()..].chars()).collect()
        }
        (Some(first), None) => first.to_lowercase().collect(),
        _ => text.to_string(),
    }
}
