use once_cell::sync::Lazy;
use regex::Regex;

use crate::parsing::normalize::normalize;

static BULLET_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[\x{f0b7}•]\s*").expect("valid bullet regex"));

/// Phrases that introduce a compound statement such as
/// "Familiarity with Docker"; the phrase itself is not a skill.
static CONNECTOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:Familiarity with|Knowledge in|Understanding of)").expect("valid connector regex")
});

/// Splits the Skills section into discrete phrases, in encounter order.
/// Duplicates are kept; only empty pieces are dropped.
pub fn extract_skills(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    BULLET_SPLIT_RE
        .split(text)
        .filter(|piece| !piece.trim().is_empty())
        .map(normalize)
        .flat_map(|skill| {
            CONNECTOR_RE
                .split(&skill)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
