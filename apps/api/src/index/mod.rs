//! Indexing adapters. The parser only shapes the record; persisting it in a
//! search engine happens behind `CandidateIndexer`.

pub mod elastic;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::CandidateRecord;

pub use elastic::ElasticIndexer;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search engine error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("candidate record has no id")]
    MissingId,
}

#[async_trait]
pub trait CandidateIndexer: Send + Sync {
    /// Creates the target index with the candidate mapping if it is absent.
    async fn ensure_index(&self) -> Result<(), IndexError>;

    /// Stores the record under its `id` and returns the document id. A record
    /// whose id is already indexed is left untouched.
    async fn index_candidate(
        &self,
        record: &CandidateRecord,
        original: Option<&[u8]>,
    ) -> Result<String, IndexError>;
}
