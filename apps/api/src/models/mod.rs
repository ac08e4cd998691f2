pub mod candidate;

pub use candidate::{
    CandidateRecord, ContactInfo, EducationEntry, ExperienceEntry, RecordMetadata,
    SENTINEL_CANDIDATE_ID,
};
