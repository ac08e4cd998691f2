use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level résumé sections recognised by the segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionName {
    ContactInformation,
    Profile,
    Experiences,
    Education,
    Skills,
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SectionName::ContactInformation => "Contact Information",
            SectionName::Profile => "Profile",
            SectionName::Experiences => "Experiences",
            SectionName::Education => "Education",
            SectionName::Skills => "Skills",
        };
        f.write_str(s)
    }
}

/// One boundary pair: the section body runs from just after `label` up to the
/// first following `next_label`, or to the end of the text when there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionAnchor {
    pub section: SectionName,
    pub label: String,
    pub next_label: Option<String>,
}

impl SectionAnchor {
    pub fn new(section: SectionName, label: &str, next_label: Option<&str>) -> Self {
        Self {
            section,
            label: label.to_string(),
            next_label: next_label.map(str::to_string),
        }
    }
}

/// Knobs for the parsing pipeline. `Default` reproduces the standard
/// English résumé layout: Contact Information → Profile → Experiences →
/// Education → Skills.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Boundary anchors, in the order the sections are expected to appear.
    pub anchors: Vec<SectionAnchor>,
    /// A line starting with one of these opens a new experience entry.
    pub experience_lead_words: Vec<String>,
    /// A line starting with one of these opens a new education entry; a line
    /// containing one (case-insensitive) is a degree line.
    pub degree_keywords: Vec<String>,
    /// Language tag copied into record metadata.
    pub language: String,
}

const EXPERIENCE_LEAD_WORDS: &[&str] = &[
    "Entry Level",
    "Senior",
    "Junior",
    "Associate",
    "Lead",
    "Principal",
    "Software",
    "Developer",
    "Engineer",
];

const DEGREE_KEYWORDS: &[&str] = &[
    "Bachelor",
    "Master",
    "Ph.D",
    "MBA",
    "Associate",
    "Diploma",
    "Certificate",
];

pub const DEFAULT_LANGUAGE: &str = "English";

pub fn default_anchors() -> Vec<SectionAnchor> {
    vec![
        SectionAnchor::new(
            SectionName::ContactInformation,
            "Contact Information",
            Some("Profile"),
        ),
        SectionAnchor::new(SectionName::Profile, "Profile", Some("Experiences")),
        SectionAnchor::new(SectionName::Experiences, "Experiences", Some("Education")),
        SectionAnchor::new(SectionName::Education, "Education", Some("Skills")),
        SectionAnchor::new(SectionName::Skills, "Skills", None),
    ]
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            anchors: default_anchors(),
            experience_lead_words: EXPERIENCE_LEAD_WORDS.iter().map(|s| s.to_string()).collect(),
            degree_keywords: DEGREE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl ParserConfig {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
