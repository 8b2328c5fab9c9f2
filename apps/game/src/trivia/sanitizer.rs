//! Response sanitizer — turns raw model text into a validated `FactSet`.
//!
//! The only repair attempted is removing Markdown code fences. Everything else
//! must already match the `{"facts": [...]}` schema.

use thiserror::Error;

use crate::trivia::models::FactSet;

const FENCE: &str = "```";

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("response is not a valid fact set: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fact set must contain exactly one false statement, found {false_count}")]
    SchemaViolation { false_count: usize },
}

/// Removes every triple-backtick marker, plus any language tag directly after it.
pub fn strip_code_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        rest = rest[pos + FENCE.len()..].trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    out.push_str(rest);

    out
}

/// Strips fences, trims, and parses the remaining text as a fact set.
pub fn parse_fact_set(raw: &str) -> Result<FactSet, SanitizeError> {
    let cleaned = strip_code_fences(raw);
    let set = serde_json::from_str(cleaned.trim())?;
    Ok(set)
}

/// Rejects sets that do not hold exactly one lie.
pub fn validate_fact_set(set: &FactSet) -> Result<(), SanitizeError> {
    match set.false_count() {
        1 => Ok(()),
        false_count => Err(SanitizeError::SchemaViolation { false_count }),
    }
}
