use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if a set variable does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    /// Elasticsearch base URL. Indexing is disabled when unset.
    pub elasticsearch_url: Option<String>,
    pub elasticsearch_index: String,
    pub max_upload_bytes: usize,
    pub resume_language: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            elasticsearch_url: non_empty("ELASTICSEARCH_URL"),
            elasticsearch_index: non_empty("ELASTICSEARCH_INDEX")
                .unwrap_or_else(|| "cvs".to_string()),
            max_upload_bytes: match non_empty("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            resume_language: non_empty("RESUME_LANGUAGE")
                .unwrap_or_else(|| "English".to_string()),
            port: non_empty("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
