use std::sync::Arc;

use crate::config::Config;
use crate::extract::TextExtractor;
use crate::index::CandidateIndexer;
use crate::parsing::ResumeParser;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub parser: Arc<ResumeParser>,
    /// Pluggable text extractor. Default: PdfTextExtractor.
    pub extractor: Arc<dyn TextExtractor>,
    /// `None` when ELASTICSEARCH_URL is unset; uploads are parsed but not indexed.
    pub indexer: Option<Arc<dyn CandidateIndexer>>,
}
