// Résumé parsing core.
// Raw text -> sections -> {skills, experience, education, contact} -> record.
// Pure and stateless: no I/O, no shared mutable state, never fails.

pub mod assemble;
pub mod config;
pub mod contact;
pub mod diagnostics;
pub mod education;
pub mod experience;
pub mod normalize;
pub mod rules;
pub mod sections;
pub mod skills;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

pub use config::{ParserConfig, SectionAnchor, SectionName};
pub use diagnostics::{EntryError, EntryKind, ParseDiagnostic};
pub use rules::{DropReason, EntryOutcome};

use crate::models::CandidateRecord;
use crate::parsing::assemble::{assemble_record, RecordParts};
use crate::parsing::contact::extract_contact;
use crate::parsing::education::EducationParser;
use crate::parsing::experience::ExperienceParser;
use crate::parsing::sections::segment;
use crate::parsing::skills::extract_skills;

/// The parsed record plus every non-fatal event seen on the way.
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    pub record: CandidateRecord,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Configured parsing pipeline. Immutable; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ResumeParser {
    config: ParserConfig,
    experience: ExperienceParser,
    education: EducationParser,
}

impl ResumeParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            experience: ExperienceParser::new(config.experience_lead_words.clone()),
            education: EducationParser::new(config.degree_keywords.clone()),
            config,
        }
    }

    pub fn with_experience_parser(mut self, parser: ExperienceParser) -> Self {
        self.experience = parser;
        self
    }

    pub fn with_education_parser(mut self, parser: EducationParser) -> Self {
        self.education = parser;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&self, raw_text: &str, source_label: &str) -> CandidateRecord {
        self.parse_with_report(raw_text, source_label).record
    }

    pub fn parse_with_report(&self, raw_text: &str, source_label: &str) -> ParseReport {
        let segmentation = segment(raw_text, &self.config.anchors);
        let mut diagnostics = segmentation.diagnostics.clone();

        let experience = collect_kept(
            self.experience
                .parse_all(segmentation.get(SectionName::Experiences)),
            EntryKind::Experience,
            &mut diagnostics,
        );
        let education = collect_kept(
            self.education
                .parse_all(segmentation.get(SectionName::Education)),
            EntryKind::Education,
            &mut diagnostics,
        );

        let parts = RecordParts {
            profile: segmentation.get(SectionName::Profile).to_string(),
            skills: extract_skills(segmentation.get(SectionName::Skills)),
            experience,
            education,
            contact: extract_contact(segmentation.get(SectionName::ContactInformation)),
        };

        let record = assemble_record(parts, source_label, &self.config.language, Utc::now());
        debug!(
            "Parsed '{}' as candidate {}: {} skills, {} experience, {} education, {} diagnostics",
            source_label,
            record.id,
            record.skills.len(),
            record.experience.len(),
            record.education.len(),
            diagnostics.len()
        );

        ParseReport {
            record,
            diagnostics,
        }
    }
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

/// Parses with the default configuration.
pub fn parse(raw_text: &str, source_label: &str) -> CandidateRecord {
    ResumeParser::default().parse(raw_text, source_label)
}

fn collect_kept<E>(
    outcomes: Vec<EntryOutcome<E>>,
    entry: EntryKind,
    diagnostics: &mut Vec<ParseDiagnostic>,
) -> Vec<E> {
    let mut kept = Vec::new();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            EntryOutcome::Kept(e) => kept.push(e),
            EntryOutcome::Dropped(DropReason::ParseFailure { message }) => {
                diagnostics.push(ParseDiagnostic::EntryParseFailure {
                    entry,
                    index,
                    message,
                });
            }
            EntryOutcome::Dropped(DropReason::MissingFields { missing }) => {
                diagnostics.push(ParseDiagnostic::MalformedFieldSkip {
                    entry,
                    index,
                    missing: missing.into_iter().map(str::to_string).collect(),
                });
            }
        }
    }
    kept
}
