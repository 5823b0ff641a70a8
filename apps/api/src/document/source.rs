//! Document Source: the one asynchronous boundary of the engine.
//!
//! A source yields the raw text of a resume document. `load_document` turns
//! that text into the normalized entry list the parser consumes.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::document::case::normalize_keys;

const FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("document is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document must be a sequence of entries, found {found}")]
    Shape { found: &'static str },
}

/// Where a resume document comes from.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load(&self) -> Result<String, DocumentError>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// A document on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn load(&self) -> Result<String, DocumentError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DocumentError::Io {
                path: self.path.clone(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A document fetched with a plain GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, DocumentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn load(&self) -> Result<String, DocumentError> {
        debug!(url = %self.url, "fetching resume document");
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Loads the document and returns its entries with normalized keys.
///
/// An empty document has no entries.
pub async fn load_document(source: &dyn DocumentSource) -> Result<Vec<Value>, DocumentError> {
    let text = source.load().await?;
    let entries = parse_entries(&text)?;
    info!(source = %source.describe(), entries = entries.len(), "resume document loaded");
    Ok(entries)
}

/// Decodes YAML text into a normalized entry list.
pub fn parse_entries(text: &str) -> Result<Vec<Value>, DocumentError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_yaml::from_str(text)?;
    match normalize_keys(value) {
        Value::Array(entries) => Ok(entries),
        Value::Null => Ok(Vec::new()),
        other => Err(DocumentError::Shape {
            found: kind_of(&other),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
