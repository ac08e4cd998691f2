use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::index::{CandidateIndexer, IndexError};
use crate::models::CandidateRecord;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Elasticsearch-backed indexer. The record `id` is the document id, so
/// re-uploading the same candidate is a no-op.
#[derive(Clone)]
pub struct ElasticIndexer {
    client: Client,
    base_url: String,
    index: String,
}

#[derive(Serialize)]
struct IndexDocument<'a> {
    #[serde(flatten)]
    record: &'a CandidateRecord,
    /// Base64 of the original upload, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    cv_data: Option<String>,
}

#[derive(Deserialize)]
struct IndexResponse {
    #[serde(rename = "_id")]
    id: String,
}

/// Index settings and mapping for candidate records. Object-valued record
/// fields get object or `nested` mappings; free text goes through
/// `cv_analyzer`.
pub fn index_definition() -> Value {
    let analyzed = json!({
        "type": "text",
        "analyzer": "cv_analyzer",
        "search_analyzer": "cv_analyzer"
    });
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1,
            "analysis": {
                "analyzer": {
                    "cv_analyzer": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "stop", "snowball"]
                    }
                }
            }
        },
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "profile": analyzed,
                "skills": {
                    "type": "text",
                    "analyzer": "cv_analyzer",
                    "search_analyzer": "cv_analyzer",
                    "fields": { "keyword": { "type": "keyword" } }
                },
                "experience": {
                    "type": "nested",
                    "properties": {
                        "title": analyzed,
                        "company": analyzed,
                        "duration": { "type": "text" },
                        "description": analyzed
                    }
                },
                "education": {
                    "type": "nested",
                    "properties": {
                        "degree": analyzed,
                        "institution": analyzed,
                        "duration": { "type": "text" }
                    }
                },
                "contact": {
                    "properties": {
                        "email": { "type": "keyword" },
                        "phone": { "type": "keyword" },
                        "location": { "type": "text" }
                    }
                },
                "cv_data": { "type": "binary" },
                "metadata": {
                    "properties": {
                        "timestamp": { "type": "date" },
                        "source_file_name": { "type": "keyword" },
                        "language": { "type": "keyword" }
                    }
                }
            }
        }
    })
}

impl ElasticIndexer {
    pub fn new(base_url: &str, index: &str) -> Result<Self, IndexError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
        })
    }

    fn index_url(&self) -> String {
        format!("{}/{}", self.base_url, self.index)
    }

    fn doc_url(&self, id: &str) -> String {
        format!("{}/_doc/{}", self.index_url(), id)
    }
}

async fn api_error(response: reqwest::Response) -> IndexError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    IndexError::Api { status, message }
}

#[async_trait]
impl CandidateIndexer for ElasticIndexer {
    async fn ensure_index(&self) -> Result<(), IndexError> {
        let response = self.client.head(self.index_url()).send().await?;
        match response.status() {
            StatusCode::OK => {
                info!("Index {} already exists", self.index);
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                let created = self
                    .client
                    .put(self.index_url())
                    .json(&index_definition())
                    .send()
                    .await?;
                if !created.status().is_success() {
                    return Err(api_error(created).await);
                }
                info!("Created index {}", self.index);
                Ok(())
            }
            _ => Err(api_error(response).await),
        }
    }

    async fn index_candidate(
        &self,
        record: &CandidateRecord,
        original: Option<&[u8]>,
    ) -> Result<String, IndexError> {
        if record.id.is_empty() {
            return Err(IndexError::MissingId);
        }

        let existing = self.client.head(self.doc_url(&record.id)).send().await?;
        if existing.status() == StatusCode::OK {
            info!(
                "Document with id {} already exists. Skipping indexing.",
                record.id
            );
            return Ok(record.id.clone());
        }

        let document = IndexDocument {
            record,
            cv_data: original.map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes)),
        };

        info!(
            "Indexing candidate {} from {}",
            record.id, record.metadata.source_file_name
        );
        let response = self
            .client
            .put(self.doc_url(&record.id))
            .json(&document)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: IndexResponse = response.json().await?;
        Ok(body.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse;

    #[test]
    fn test_urls_trim_trailing_slash() {
        let indexer = ElasticIndexer::new("http://localhost:9200/", "cvs").unwrap();
        assert_eq!(indexer.index_url(), "http://localhost:9200/cvs");
        assert_eq!(indexer.doc_url("4567"), "http://localhost:9200/cvs/_doc/4567");
    }

    #[test]
    fn test_mapping_uses_custom_analyzer_for_search_fields() {
        let def = index_definition();
        let props = &def["mappings"]["properties"];
        assert_eq!(props["id"]["type"], "keyword");
        assert_eq!(props["profile"]["analyzer"], "cv_analyzer");
        assert_eq!(props["skills"]["analyzer"], "cv_analyzer");
        assert_eq!(props["experience"]["properties"]["description"]["analyzer"], "cv_analyzer");
        assert_eq!(props["education"]["properties"]["degree"]["analyzer"], "cv_analyzer");
        assert_eq!(props["contact"]["properties"]["email"]["type"], "keyword");
        assert_eq!(
            def["settings"]["analysis"]["analyzer"]["cv_analyzer"]["filter"],
            json!(["lowercase", "stop", "snowball"])
        );
    }

    /// Checks every value in `doc` against the mapping entry for it. Objects
    /// need `properties` (and `nested` or no type); strings need a scalar type.
    fn assert_mapping_accepts(path: &str, mapping: &Value, doc: &Value) {
        match doc {
            Value::Object(fields) => {
                let ty = mapping.get("type").and_then(Value::as_str);
                assert!(
                    ty.is_none() || ty == Some("nested") || ty == Some("object"),
                    "{path}: object value mapped as {ty:?}"
                );
                for (name, value) in fields {
                    let child = &mapping["properties"][name];
                    assert!(!child.is_null(), "{path}.{name}: no mapping");
                    assert_mapping_accepts(&format!("{path}.{name}"), child, value);
                }
            }
            Value::Array(items) => {
                for item in items {
                    assert_mapping_accepts(path, mapping, item);
                }
            }
            _ => {
                let ty = mapping.get("type").and_then(Value::as_str);
                assert!(
                    matches!(ty, Some("text" | "keyword" | "date" | "binary")),
                    "{path}: scalar value mapped as {ty:?}"
                );
            }
        }
    }

    #[test]
    fn test_mapping_matches_serialized_record_shape() {
        let text = "Contact Information\nEmail: an@example.com\nPhone: 090-123-4567\nLocation: Hanoi\nProfile\nBackend engineer\nExperiences\nSenior Dev\nAcme\n2020 - 2022\n• Built APIs\nEducation\nBachelor of Science\nState University\n2016 - 2020\nSkills: Rust • Go";
        let record = parse(text, "cv.pdf");
        assert_eq!(record.experience.len(), 1);
        assert_eq!(record.education.len(), 1);

        let doc = serde_json::to_value(IndexDocument {
            record: &record,
            cv_data: Some(base64::engine::general_purpose::STANDARD.encode(b"%PDF")),
        })
        .unwrap();
        let root = json!({ "properties": index_definition()["mappings"]["properties"] });
        assert_mapping_accepts("$", &root, &doc);
        assert_eq!(index_definition()["mappings"]["properties"]["experience"]["type"], "nested");
        assert_eq!(index_definition()["mappings"]["properties"]["education"]["type"], "nested");
    }

    #[test]
    fn test_document_flattens_record_and_encodes_original() {
        let record = parse("Skills: Rust", "cv.pdf");
        let doc = IndexDocument {
            record: &record,
            cv_data: Some(base64::engine::general_purpose::STANDARD.encode(b"%PDF")),
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["id"], "0000");
        assert_eq!(value["skills"], json!(["Rust"]));
        assert_eq!(value["cv_data"], "JVBERg==");
        assert_eq!(value["metadata"]["source_file_name"], "cv.pdf");
    }

    #[test]
    fn test_document_without_original_omits_cv_data() {
        let record = parse("", "cv.pdf");
        let value = serde_json::to_value(IndexDocument {
            record: &record,
            cv_data: None,
        })
        .unwrap();
        assert!(value.get("cv_data").is_none());
    }

    #[tokio::test]
    async fn test_empty_id_rejected_before_any_request() {
        let indexer = ElasticIndexer::new("http://127.0.0.1:1", "cvs").unwrap();
        let mut record = parse("", "cv.pdf");
        record.id.clear();
        let err = indexer.index_candidate(&record, None).await.unwrap_err();
        assert!(matches!(err, IndexError::MissingId));
    }
}
