//! Text extraction adapters. Turn uploaded document bytes into the raw text
//! the parser consumes. PDF extraction is CPU-bound and runs on the blocking
//! pool.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, content: Bytes) -> Result<String, ExtractError>;
}

/// Page-based PDF text extraction via `pdf-extract`.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, content: Bytes) -> Result<String, ExtractError> {
        let size = content.len();
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&content).map_err(|e| ExtractError::Pdf(e.to_string()))
        })
        .await??;
        debug!("Extracted {} chars from {} byte PDF", text.len(), size);
        Ok(text)
    }
}

/// Treats the upload as UTF-8 text; invalid sequences are replaced.
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, content: Bytes) -> Result<String, ExtractError> {
        Ok(String::from_utf8_lossy(&content).into_owned())
    }
}
