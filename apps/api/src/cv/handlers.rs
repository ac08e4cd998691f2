use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cv::upload::{collect_files, UploadedFile};
use crate::errors::AppError;
use crate::models::CandidateRecord;
use crate::parsing::ParseReport;
use crate::state::AppState;

const INLINE_SOURCE_LABEL: &str = "inline";

#[derive(Deserialize)]
pub struct ParseRequest {
    pub raw_text: String,
    #[serde(default)]
    pub source_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Success,
    Error,
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct FileResult {
    pub filename: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<CandidateRecord>,
}

impl FileResult {
    fn skipped(filename: String, message: &str) -> Self {
        Self {
            filename,
            status: FileStatus::Skipped,
            doc_id: None,
            message: Some(message.to_string()),
            record: None,
        }
    }

    fn error(filename: String, message: String, record: Option<CandidateRecord>) -> Self {
        Self {
            filename,
            status: FileStatus::Error,
            doc_id: None,
            message: Some(message),
            record,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub processed_files: Vec<FileResult>,
}

/// POST /api/v1/cv/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> Result<Json<ParseReport>, AppError> {
    let label = req
        .source_label
        .unwrap_or_else(|| INLINE_SOURCE_LABEL.to_string());
    let parser = state.parser.clone();
    let report = tokio::task::spawn_blocking(move || parser.parse_with_report(&req.raw_text, &label))
        .await
        .map_err(anyhow::Error::from)?;
    Ok(Json(report))
}

/// POST /api/v1/cv/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let files = collect_files(multipart).await.map_err(AppError::Validation)?;
    if files.is_empty() {
        return Err(AppError::Validation("No files uploaded".to_string()));
    }

    info!("Received {} file(s) for upload", files.len());
    let mut processed_files = Vec::with_capacity(files.len());
    for file in files {
        processed_files.push(process_file(&state, file).await);
    }

    Ok(Json(UploadResponse { processed_files }))
}

/// Extract, parse and index one file. Failures are reported in the result
/// and never abort the batch.
async fn process_file(state: &AppState, file: UploadedFile) -> FileResult {
    if !file.is_pdf() {
        return FileResult::skipped(file.filename, "Only .pdf files are accepted");
    }

    let text = match state.extractor.extract(file.data.clone()).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to extract text from {}: {}", file.filename, e);
            return FileResult::error(file.filename, e.to_string(), None);
        }
    };

    let parser = state.parser.clone();
    let label = file.filename.clone();
    let record = match tokio::task::spawn_blocking(move || parser.parse(&text, &label)).await {
        Ok(record) => record,
        Err(e) => {
            warn!("Parsing task for {} failed: {}", file.filename, e);
            return FileResult::error(file.filename, e.to_string(), None);
        }
    };

    let Some(indexer) = &state.indexer else {
        return FileResult {
            filename: file.filename,
            status: FileStatus::Success,
            doc_id: None,
            message: Some("Parsed; indexing is disabled".to_string()),
            record: Some(record),
        };
    };

    match indexer.index_candidate(&record, Some(&file.data[..])).await {
        Ok(doc_id) => {
            info!("Indexed {} as {}", file.filename, doc_id);
            FileResult {
                filename: file.filename,
                status: FileStatus::Success,
                doc_id: Some(doc_id),
                message: None,
                record: Some(record),
            }
        }
        Err(e) => {
            warn!("Failed to index {}: {}", file.filename, e);
            FileResult::error(file.filename, e.to_string(), Some(record))
        }
    }
}
