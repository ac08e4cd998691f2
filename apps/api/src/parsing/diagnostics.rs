use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parsing::config::SectionName;

/// Failure raised by a classification rule while processing one entry.
/// Aborts that entry only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("rule '{rule}' expected a 'key: value' line, got '{line}'")]
    MissingValue { rule: &'static str, line: String },

    #[error("rule '{rule}' rejected line '{line}': {reason}")]
    Rejected {
        rule: &'static str,
        line: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Experience,
    Education,
}

/// Non-fatal events observed while parsing a document. Never returned as
/// errors; surfaced next to the record so callers can see what was omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseDiagnostic {
    MissingSection {
        section: SectionName,
    },
    /// The section label exists but its closing label only appears before it.
    OutOfOrderSection {
        section: SectionName,
        expected_next: String,
    },
    /// The section label exists but its closing label never appears.
    UnterminatedSection {
        section: SectionName,
        expected_next: String,
    },
    EntryParseFailure {
        entry: EntryKind,
        index: usize,
        message: String,
    },
    MalformedFieldSkip {
        entry: EntryKind,
        index: usize,
        missing: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_diagnostic_serializes_with_kind_tag() {
        let d = ParseDiagnostic::OutOfOrderSection {
            section: SectionName::Education,
            expected_next: "Skills".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!({"kind": "out_of_order_section", "section": "Education", "expected_next": "Skills"})
        );
    }

    #[test]
    fn test_entry_error_message_names_rule() {
        let e = EntryError::MissingValue {
            rule: "labeled_company",
            line: "Company".to_string(),
        };
        assert!(e.to_string().contains("labeled_company"));
    }
}
