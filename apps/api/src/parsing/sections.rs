//! Section segmentation over raw (pre-normalization) résumé text.
//!
//! Each section is located by its anchor pair: the body starts right after
//! the section label and stops at the first following occurrence of the
//! next label. Matching is case-sensitive and spans line breaks. Sections
//! must appear in anchor order; a section whose closing label only occurs
//! earlier in the text is reported, not recovered.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::parsing::config::{SectionAnchor, SectionName};
use crate::parsing::diagnostics::ParseDiagnostic;

pub type SectionMap = BTreeMap<SectionName, String>;

#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub sections: SectionMap,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Segmentation {
    /// Section body, or `""` when the section was not captured.
    pub fn get(&self, section: SectionName) -> &str {
        self.sections.get(&section).map(String::as_str).unwrap_or("")
    }
}

pub fn segment(text: &str, anchors: &[SectionAnchor]) -> Segmentation {
    let mut out = Segmentation::default();

    for anchor in anchors {
        match capture(text, anchor) {
            Capture::Found(body) => {
                out.sections.insert(anchor.section, clean_body(body));
            }
            Capture::LabelMissing => {
                debug!("Section '{}' not found", anchor.section);
                out.diagnostics.push(ParseDiagnostic::MissingSection {
                    section: anchor.section,
                });
            }
            Capture::Unterminated { expected_next } => {
                let before = text.contains(expected_next.as_str());
                if before {
                    warn!(
                        "Section '{}' appears after its closing label '{}'; skipped",
                        anchor.section, expected_next
                    );
                    out.diagnostics.push(ParseDiagnostic::OutOfOrderSection {
                        section: anchor.section,
                        expected_next,
                    });
                } else {
                    debug!(
                        "Section '{}' has no closing label '{}'",
                        anchor.section, expected_next
                    );
                    out.diagnostics.push(ParseDiagnostic::UnterminatedSection {
                        section: anchor.section,
                        expected_next,
                    });
                }
            }
        }
    }

    out
}

enum Capture<'a> {
    Found(&'a str),
    LabelMissing,
    Unterminated { expected_next: String },
}

/// Earliest label occurrence that has a closing label somewhere after it.
///
/// Only the first label occurrence can qualify: a closing label that does
/// not follow it follows no later occurrence either. Each search is a single
/// forward scan.
fn capture<'a>(text: &'a str, anchor: &SectionAnchor) -> Capture<'a> {
    if anchor.label.is_empty() {
        return Capture::LabelMissing;
    }
    let Some(start) = text.find(anchor.label.as_str()) else {
        return Capture::LabelMissing;
    };
    let rest = &text[start + anchor.label.len()..];

    match anchor.next_label.as_deref() {
        Some(next) if !next.is_empty() => match rest.find(next) {
            Some(end) => Capture::Found(&rest[..end]),
            None => Capture::Unterminated {
                expected_next: next.to_string(),
            },
        },
        _ => Capture::Found(rest),
    }
}

/// Trims the body and drops a `:` left over from headings like `Skills:`.
fn clean_body(body: &str) -> String {
    let body = body.trim();
    body.strip_prefix(':').unwrap_or(body).trim().to_string()
}
