use axum::extract::Multipart;
use bytes::Bytes;

/// Multipart field names accepted for uploaded files.
const FILE_FIELDS: [&str; 2] = ["files[]", "files"];

/// One uploaded file, held in memory for the duration of the request.
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn is_pdf(&self) -> bool {
        self.filename.to_lowercase().ends_with(".pdf")
    }
}

/// Collect every file part from a multipart upload. Other fields are drained
/// and ignored.
pub async fn collect_files(mut multipart: Multipart) -> Result<Vec<UploadedFile>, String> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();
        if !FILE_FIELDS.contains(&name.as_str()) {
            let _ = field.bytes().await;
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| format!("Failed to read file data: {}", e))?;

        // Browsers send an empty part when no file was chosen.
        if filename.is_empty() && data.is_empty() {
            continue;
        }
        files.push(UploadedFile { filename, data });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            data: Bytes::new(),
        }
    }

    #[test]
    fn test_pdf_extension_is_case_insensitive() {
        assert!(file("cv.pdf").is_pdf());
        assert!(file("CV.PDF").is_pdf());
        assert!(!file("cv.docx").is_pdf());
        assert!(!file("pdf").is_pdf());
    }
}
