//! Experience entry parsing.
//!
//! The section is cut into entries at lines that open with a role or
//! seniority lead word, then every line after the title is classified by
//! the experience rule ladder. Explicit `key: value` labels outrank
//! positional guesses, and any other labeled line is discarded. A
//! date-shaped line only becomes the duration once the company slot has
//! been claimed.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace, warn};

use crate::models::ExperienceEntry;
use crate::parsing::diagnostics::EntryError;
use crate::parsing::normalize::{normalize, PDF_BULLET};
use crate::parsing::rules::{
    append_spaced, Applied, DropReason, EntryOutcome, LineContext, Rule, RuleLadder,
};

static DATE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4}|\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\b")
        .expect("valid date token regex")
});

fn key_value(line: &str) -> Option<(&str, &str)> {
    line.split_once(": ")
}

fn key_contains(line: &str, needles: &[&str]) -> bool {
    key_value(line)
        .map(|(key, _)| {
            let key = key.to_lowercase();
            needles.iter().any(|n| key.contains(n))
        })
        .unwrap_or(false)
}

fn labeled_value<'a>(rule: &'static str, line: &'a str) -> Result<&'a str, EntryError> {
    key_value(line)
        .map(|(_, value)| value)
        .ok_or_else(|| EntryError::MissingValue {
            rule,
            line: line.to_string(),
        })
}

fn is_labeled_company(_: &ExperienceEntry, ctx: &LineContext<'_>) -> bool {
    key_contains(ctx.line, &["company"])
}

fn assign_labeled_company(
    e: &mut ExperienceEntry,
    ctx: &LineContext<'_>,
) -> Result<Applied, EntryError> {
    e.company = normalize(labeled_value("labeled_company", ctx.line)?);
    Ok(Applied::Line)
}

fn is_labeled_duration(_: &ExperienceEntry, ctx: &LineContext<'_>) -> bool {
    key_contains(ctx.line, &["duration", "period"])
}

fn assign_labeled_duration(
    e: &mut ExperienceEntry,
    ctx: &LineContext<'_>,
) -> Result<Applied, EntryError> {
    e.duration = normalize(labeled_value("labeled_duration", ctx.line)?);
    Ok(Applied::Line)
}

fn is_other_label(_: &ExperienceEntry, ctx: &LineContext<'_>) -> bool {
    key_value(ctx.line).is_some()
}

fn discard(_: &mut ExperienceEntry, ctx: &LineContext<'_>) -> Result<Applied, EntryError> {
    trace!("Discarding unrecognised label line '{}'", ctx.line);
    Ok(Applied::Line)
}

fn has_description_marker(_: &ExperienceEntry, ctx: &LineContext<'_>) -> bool {
    ctx.line.contains("Description") || ctx.line.contains(PDF_BULLET) || ctx.line.contains('•')
}

fn needs_company(e: &ExperienceEntry, _: &LineContext<'_>) -> bool {
    e.company.is_empty() && e.duration.is_empty()
}

fn assign_company(e: &mut ExperienceEntry, ctx: &LineContext<'_>) -> Result<Applied, EntryError> {
    e.company = normalize(ctx.line);
    Ok(Applied::Line)
}

fn is_date_shaped(e: &ExperienceEntry, ctx: &LineContext<'_>) -> bool {
    e.duration.is_empty() && DATE_TOKEN_RE.is_match(ctx.line)
}

fn assign_duration(e: &mut ExperienceEntry, ctx: &LineContext<'_>) -> Result<Applied, EntryError> {
    e.duration = normalize(ctx.line);
    Ok(Applied::Line)
}

fn always(_: &ExperienceEntry, _: &LineContext<'_>) -> bool {
    true
}

fn append_description(
    e: &mut ExperienceEntry,
    ctx: &LineContext<'_>,
) -> Result<Applied, EntryError> {
    append_spaced(&mut e.description, &normalize(ctx.line));
    Ok(Applied::Line)
}

/// Default priority order for lines after the title.
pub fn experience_ladder() -> RuleLadder<ExperienceEntry> {
    RuleLadder::new(vec![
        Rule {
            name: "labeled_company",
            applies: is_labeled_company,
            assign: assign_labeled_company,
        },
        Rule {
            name: "labeled_duration",
            applies: is_labeled_duration,
            assign: assign_labeled_duration,
        },
        Rule {
            name: "labeled_other",
            applies: is_other_label,
            assign: discard,
        },
        Rule {
            name: "description_marker",
            applies: has_description_marker,
            assign: append_description,
        },
        Rule {
            name: "positional_company",
            applies: needs_company,
            assign: assign_company,
        },
        Rule {
            name: "date_shaped_duration",
            applies: is_date_shaped,
            assign: assign_duration,
        },
        Rule {
            name: "description_fallback",
            applies: always,
            assign: append_description,
        },
    ])
}

#[derive(Debug, Clone)]
pub struct ExperienceParser {
    lead_words: Vec<String>,
    ladder: RuleLadder<ExperienceEntry>,
}

impl ExperienceParser {
    pub fn new(lead_words: Vec<String>) -> Self {
        Self {
            lead_words,
            ladder: experience_ladder(),
        }
    }

    pub fn with_ladder(mut self, ladder: RuleLadder<ExperienceEntry>) -> Self {
        self.ladder = ladder;
        self
    }

    fn opens_entry(&self, line: &str) -> bool {
        self.lead_words.iter().any(|w| line.starts_with(w.as_str()))
    }

    /// Cuts the section before every line that opens with a lead word.
    pub fn split_entries(&self, text: &str) -> Vec<String> {
        let mut entries = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.split('\n') {
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
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect()
    }

    pub fn parse_entry(&self, entry: &str) -> EntryOutcome<ExperienceEntry> {
        let lines: Vec<String> = entry
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        let Some((first, rest)) = lines.split_first() else {
            return EntryOutcome::Dropped(DropReason::MissingFields {
                missing: vec!["title", "company"],
            });
        };

        let mut exp = ExperienceEntry {
            title: normalize(first),
            ..Default::default()
        };

        if let Err(e) = self.ladder.classify_lines(&mut exp, rest) {
            return EntryOutcome::Dropped(DropReason::ParseFailure {
                message: e.to_string(),
            });
        }

        let mut missing = Vec::new();
        if exp.title.is_empty() {
            missing.push("title");
        }
        if exp.company.is_empty() {
            missing.push("company");
        }
        if missing.is_empty() {
            trace!("Kept experience entry '{}' at '{}'", exp.title, exp.company);
            EntryOutcome::Kept(exp)
        } else {
            EntryOutcome::Dropped(DropReason::MissingFields { missing })
        }
    }

    /// One outcome per entry, in source order. A failing entry never affects
    /// its neighbours.
    pub fn parse_all(&self, text: &str) -> Vec<EntryOutcome<ExperienceEntry>> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.split_entries(text)
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let outcome = self.parse_entry(entry);
                match &outcome {
                    EntryOutcome::Dropped(DropReason::ParseFailure { message }) => {
                        warn!("Error processing experience entry {index}: {message}");
                    }
                    EntryOutcome::Dropped(DropReason::MissingFields { missing }) => {
                        debug!("Experience entry {index} dropped, missing {missing:?}");
                    }
                    EntryOutcome::Kept(_) => {}
                }
                outcome
            })
            .collect()
    }

    pub fn parse(&self, text: &str) -> Vec<ExperienceEntry> {
        self.parse_all(text)
            .into_iter()
            .filter_map(EntryOutcome::kept)
            .collect()
    }
}

impl Default for ExperienceParser {
    fn default() -> Self {
        Self::new(crate::parsing::config::ParserConfig::default().experience_lead_words)
    }
}
