//! Education entry parsing.
//!
//! Entries are separated by blank lines or by a line that opens with a
//! degree keyword. Inside an entry every normalized line is classified by
//! the education ladder; a degree line may claim the following line as the
//! institution when it names a university, college, school or institute.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::EducationEntry;
use crate::parsing::diagnostics::EntryError;
use crate::parsing::normalize::normalize;
use crate::parsing::rules::{Applied, DropReason, EntryOutcome, LineContext, Rule, RuleLadder};

const INSTITUTION_KEYWORDS: &[&str] = &["university", "college", "school", "institute"];

const MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").expect("valid year regex"));

static INSTITUTION_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Institution:\s*").expect("valid label regex"));

/// Entry under construction plus the lower-cased degree keywords the rules
/// match against.
#[derive(Debug, Clone, Default)]
pub struct EducationDraft {
    pub entry: EducationEntry,
    degree_keywords: Vec<String>,
}

impl EducationDraft {
    pub fn new(degree_keywords: &[String]) -> Self {
        Self {
            entry: EducationEntry::default(),
            degree_keywords: degree_keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

fn names_institution(line: &str) -> bool {
    let lower = line.to_lowercase();
    INSTITUTION_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub fn strip_institution_label(line: &str) -> String {
    INSTITUTION_LABEL_RE.replace(line, "").into_owned()
}

fn has_degree_keyword(d: &EducationDraft, ctx: &LineContext<'_>) -> bool {
    let lower = ctx.line.to_lowercase();
    d.degree_keywords.iter().any(|k| lower.contains(k.as_str()))
}

fn assign_degree(d: &mut EducationDraft, ctx: &LineContext<'_>) -> Result<Applied, EntryError> {
    d.entry.degree = ctx.line.to_string();
    if d.entry.institution.is_empty() {
        if let Some(next) = ctx.next.filter(|n| names_institution(n)) {
            d.entry.institution = strip_institution_label(next);
            return Ok(Applied::LineAndNext);
        }
    }
    Ok(Applied::Line)
}

fn is_institution_line(_: &EducationDraft, ctx: &LineContext<'_>) -> bool {
    ctx.line.to_lowercase().contains("institution:") || names_institution(ctx.line)
}

fn assign_institution(
    d: &mut EducationDraft,
    ctx: &LineContext<'_>,
) -> Result<Applied, EntryError> {
    d.entry.institution = strip_institution_label(ctx.line);
    Ok(Applied::Line)
}

fn is_date_shaped(_: &EducationDraft, ctx: &LineContext<'_>) -> bool {
    let lower = ctx.line.to_lowercase();
    MONTHS.iter().any(|m| lower.contains(m)) || YEAR_RE.is_match(ctx.line)
}

fn assign_duration(d: &mut EducationDraft, ctx: &LineContext<'_>) -> Result<Applied, EntryError> {
    d.entry.duration = ctx.line.trim().to_string();
    Ok(Applied::Line)
}

pub fn education_ladder() -> RuleLadder<EducationDraft> {
    RuleLadder::new(vec![
        Rule {
            name: "degree_keyword",
            applies: has_degree_keyword,
            assign: assign_degree,
        },
        Rule {
            name: "institution_label",
            applies: is_institution_line,
            assign: assign_institution,
        },
        Rule {
            name: "date_shaped_duration",
            applies: is_date_shaped,
            assign: assign_duration,
        },
    ])
}

#[derive(Debug, Clone)]
pub struct EducationParser {
    degree_keywords: Vec<String>,
    ladder: RuleLadder<EducationDraft>,
}

impl EducationParser {
    pub fn new(degree_keywords: Vec<String>) -> Self {
        Self {
            degree_keywords,
            ladder: education_ladder(),
        }
    }

    pub fn with_ladder(mut self, ladder: RuleLadder<EducationDraft>) -> Self {
        self.ladder = ladder;
        self
    }

    fn opens_entry(&self, line: &str) -> bool {
        self.degree_keywords
            .iter()
            .any(|k| line.starts_with(k.as_str()))
    }

    /// Splits at blank lines and before lines that open with a degree keyword.
    pub fn split_entries(&self, text: &str) -> Vec<String> {
        let mut entries = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.split('\n') {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    entries.push(current.join("\n"));
                    current.clear();
                }
                continue;
            }
            if !current.is_empty() && self.opens_entry(line) {
                entries.push(current.join("\n"));
                current.clear();
            }
            current.push(line);
        }
        if !current.is_empty() {
            entries.push(current.join("\n"));
        }
        entries
    }

    pub fn parse_entry(&self, entry: &str) -> EntryOutcome<EducationEntry> {
        let lines: Vec<String> = entry
            .split('\n')
            .map(normalize)
            .filter(|l| !l.is_empty())
            .collect();

        let mut draft = EducationDraft::new(&self.degree_keywords);
        if let Err(e) = self.ladder.classify_lines(&mut draft, &lines) {
            return EntryOutcome::Dropped(DropReason::ParseFailure {
                message: e.to_string(),
            });
        }

        let mut edu = draft.entry;
        if !edu.institution.is_empty() {
            edu.institution = strip_institution_label(&edu.institution);
        }

        if edu.degree.is_empty() {
            EntryOutcome::Dropped(DropReason::MissingFields {
                missing: vec!["degree"],
            })
        } else {
            EntryOutcome::Kept(edu)
        }
    }

    pub fn parse_all(&self, text: &str) -> Vec<EntryOutcome<EducationEntry>> {
        self.split_entries(text)
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let outcome = self.parse_entry(entry);
                match &outcome {
                    EntryOutcome::Dropped(DropReason::ParseFailure { message }) => {
                        warn!("Error processing education entry {index}: {message}");
                    }
                    EntryOutcome::Dropped(DropReason::MissingFields { .. }) => {
                        debug!("Education entry {index} dropped, no degree");
                    }
                    EntryOutcome::Kept(_) => {}
                }
                outcome
            })
            .collect()
    }

    pub fn parse(&self, text: &str) -> Vec<EducationEntry> {
        self.parse_all(text)
            .into_iter()
            .filter_map(EntryOutcome::kept)
            .collect()
    }
}

impl Default for EducationParser {
    fn default() -> Self {
        Self::new(crate::parsing::config::ParserConfig::default().degree_keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_claims_next_line_institution() {
        let entries = EducationParser::default()
            .parse("Master of Computer Science\nInstitution: University of Technology\nSeptember 2013 - June 2015");
        assert_eq!(
            entries,
            vec![EducationEntry {
                degree: "Master of Computer Science".into(),
                institution: "University of Technology".into(),
                duration: "September 2013 - June 2015".into(),
            }]
        );
    }

    #[test]
    fn test_split_on_degree_keyword_and_blank_line() {
        let parser = EducationParser::default();
        let text = "Bachelor of Arts\nState College\n2010 - 2014\nMBA\nHarvard Business School\n\nExchange semester\nInstitute of Paris";
        let entries = parser.split_entries(text);
        assert_eq!(entries.len(), 3);

        let parsed = parser.parse(text);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].institution, "State College");
        assert_eq!(parsed[0].duration, "2010 - 2014");
        assert_eq!(parsed[1].degree, "MBA");
        assert_eq!(parsed[1].institution, "Harvard Business School");
    }

    #[test]
    fn test_entry_without_degree_is_dropped() {
        let outcome = EducationParser::default().parse_entry("Springfield High School\n2008");
        assert_eq!(
            outcome,
            EntryOutcome::Dropped(DropReason::MissingFields {
                missing: vec!["degree"]
            })
        );
    }

    #[test]
    fn test_labeled_institution_without_keyword() {
        let edu = EducationParser::default()
            .parse_entry("Diploma in Design\nINSTITUTION: Parsons\n2019")
            .kept()
            .unwrap();
        assert_eq!(edu.institution, "Parsons");
        assert_eq!(edu.duration, "2019");
    }

    #[test]
    fn test_next_line_without_keyword_is_not_claimed() {
        let edu = EducationParser::default()
            .parse_entry("Bachelor of Science\nMay 2012")
            .kept()
            .unwrap();
        assert_eq!(edu.institution, "");
        assert_eq!(edu.duration, "May 2012");
    }

    #[test]
    fn test_degree_keyword_is_case_insensitive_inside_line() {
        let edu = EducationParser::default()
            .parse_entry("Graduated with a master's degree\nOhio State University")
            .kept()
            .unwrap();
        assert_eq!(edu.degree, "Graduated with a master's degree");
        assert_eq!(edu.institution, "Ohio State University");
    }

    #[test]
    fn test_year_must_be_word_bounded() {
        let edu = EducationParser::default()
            .parse_entry("Certificate in AWS\nID 123456")
            .kept()
            .unwrap();
        assert_eq!(edu.duration, "");
    }

    #[test]
    fn test_ladder_order_is_inspectable() {
        assert_eq!(
            education_ladder().rule_names(),
            vec!["degree_keyword", "institution_label", "date_shaped_duration"]
        );
    }

    #[test]
    fn test_strip_institution_label() {
        assert_eq!(strip_institution_label("institution:   MIT"), "MIT");
        assert_eq!(strip_institution_label("MIT Institution: x"), "MIT Institution: x");
    }

    #[test]
    fn test_empty_section() {
        assert!(EducationParser::default().parse("").is_empty());
    }
}
