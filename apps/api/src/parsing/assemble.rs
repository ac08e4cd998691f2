use chrono::{DateTime, Utc};

use crate::models::{
    CandidateRecord, ContactInfo, EducationEntry, ExperienceEntry, RecordMetadata,
    SENTINEL_CANDIDATE_ID,
};
use crate::parsing::normalize::normalize;

/// Everything the extractors produced for one document.
#[derive(Debug, Clone, Default)]
pub struct RecordParts {
    pub profile: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub contact: ContactInfo,
}

/// Last four digits of the normalized phone, or the shared sentinel.
pub fn derive_candidate_id(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() >= 4 {
        digits[digits.len() - 4..].iter().collect()
    } else {
        SENTINEL_CANDIDATE_ID.to_string()
    }
}

pub fn assemble_record(
    parts: RecordParts,
    source_label: &str,
    language: &str,
    timestamp: DateTime<Utc>,
) -> CandidateRecord {
    CandidateRecord {
        id: derive_candidate_id(&parts.contact.phone),
        profile: normalize(&parts.profile),
        skills: parts.skills,
        experience: parts.experience,
        education: parts.education,
        contact: parts.contact,
        metadata: RecordMetadata {
            timestamp,
            source_file_name: source_label.to_string(),
            language: language.to_string(),
        },
    }
}
