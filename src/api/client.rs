//! Thin fetch client for the document store, upload pipeline, and chat
//! endpoint. No retry, no auth, no caching — one request per call.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::models::{Document, Mode};

/// Errors from the server API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Server URL could not be parsed.
    #[error("invalid server URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// Transport-level failure (connect, timeout, broken stream).
    #[error("connection error: {0}")]
    Connection(String),
    /// Server answered with a non-success status.
    #[error("server returned HTTP {0}")]
    Status(u16),
    /// Response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// A local file to upload could not be read.
    #[error("failed to read {path}: {reason}")]
    File { path: String, reason: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Connection(err.to_string())
        }
    }
}

/// Server-side filter parameters for the document collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    pub query: Option<String>,
    pub doc_type: Option<String>,
    pub theme: Option<String>,
}

impl DocumentQuery {
    /// Query-string pairs, omitting unset filters.
    fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(ref query) = self.query {
            params.push(("query", query.as_str()));
        }
        if let Some(ref doc_type) = self.doc_type {
            params.push(("type", doc_type.as_str()));
        }
        if let Some(ref theme) = self.theme {
            params.push(("theme", theme.as_str()));
        }
        params
    }
}

/// Upload pipeline response.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Serialize)]
struct TextUploadRequest<'a> {
    text: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    doc_id: i64,
    message: &'a str,
    mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// Submission kind for the text upload endpoint: a pasted URL is
/// forwarded as a link for server-side scraping.
fn text_upload_kind(text: &str) -> &'static str {
    if text.trim().starts_with("http") {
        "link"
    } else {
        "text"
    }
}

/// Client for the material library server.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed = Url::parse(server_url).map_err(|err| ApiError::InvalidUrl {
            url: server_url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl {
                url: server_url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            base_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the document collection, filtered server-side.
    pub async fn list_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, ApiError> {
        let url = format!("{}/api/documents", self.base_url);
        debug!("GET {} {:?}", url, query);

        let resp = self.client.get(&url).query(&query.params()).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        let documents = resp.json().await?;
        Ok(documents)
    }

    /// Fetch a single document. Any non-success status is reported as
    /// is; the caller treats it as not-found.
    pub async fn get_document(&self, id: i64) -> Result<Document, ApiError> {
        let url = format!("{}/api/documents/{}", self.base_url, id);
        debug!("GET {}", url);

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        let document = resp.json().await?;
        Ok(document)
    }

    /// Replace a document with the given value. The response body is
    /// ignored; success is the status code.
    pub async fn update_document(&self, document: &Document) -> Result<(), ApiError> {
        let url = format!("{}/api/documents/{}", self.base_url, document.id);
        debug!("PUT {}", url);

        let resp = self.client.put(&url).json(document).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        Ok(())
    }

    /// Delete a document.
    pub async fn delete_document(&self, id: i64) -> Result<(), ApiError> {
        let url = format!("{}/api/documents/{}", self.base_url, id);
        debug!("DELETE {}", url);

        let resp = self.client.delete(&url).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        Ok(())
    }

    /// Upload a file for server-side parsing (OCR, PDF extraction).
    pub async fn upload_file(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| ApiError::File {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());

        let url = format!("{}/api/upload", self.base_url);
        debug!("POST {} ({}, {} bytes)", url, filename, bytes.len());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename);
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self.client.post(&url).multipart(form).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        let outcome = resp.json().await?;
        Ok(outcome)
    }

    /// Upload raw text, or a link for server-side scraping.
    pub async fn upload_text(&self, text: &str) -> Result<UploadResponse, ApiError> {
        let url = format!("{}/api/upload/text", self.base_url);
        let body = TextUploadRequest {
            text,
            kind: text_upload_kind(text),
        };
        debug!("POST {} (type={})", url, body.kind);

        let resp = self.client.post(&url).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        let outcome = resp.json().await?;
        Ok(outcome)
    }

    /// Ask the AI assistant about a document in the given mode.
    /// Returns the markdown reply text.
    pub async fn chat(&self, doc_id: i64, mode: Mode, message: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            doc_id,
            message,
            mode: mode.as_str(),
        };
        debug!("POST {} (doc={}, mode={})", url, doc_id, body.mode);

        let resp = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(300)) // 5 min timeout for slow models
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        let reply: ChatResponse = resp.json().await?;
        Ok(reply.response)
    }
}
