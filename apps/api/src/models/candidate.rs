use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id assigned when no usable phone number was found in the contact block.
pub const SENTINEL_CANDIDATE_ID: &str = "0000";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Lower-cased.
    pub email: String,
    /// Digits only.
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub timestamp: DateTime<Utc>,
    pub source_file_name: String,
    pub language: String,
}

/// The structured candidate record handed to the indexing collaborator.
///
/// `id` doubles as the index document id. It is derived from the trailing
/// phone digits, so two candidates can share it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    pub profile: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub contact: ContactInfo,
    pub metadata: RecordMetadata,
}
