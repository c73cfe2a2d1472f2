//! HTTP client for the analysis service's `/upload` and `/health` endpoints.

use std::path::PathBuf;

use async_trait::async_trait;
use clausekit_core::{AnalysisResult, Analyzer, CandidateFile, Rejection, UploadError, validate};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}")]
    Server {
        status: u16,
        /// The `error` field of the response body, when there was one.
        message: Option<String>,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} has no contents on disk")]
    NoContents(String),
    #[error(transparent)]
    Rejected(#[from] Rejection),
}

impl From<ClientError> for UploadError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Server {
                message: Some(message),
                ..
            } => UploadError::Service(message),
            ClientError::Rejected(rejection) => UploadError::Service(rejection.to_string()),
            _ => UploadError::Failed,
        }
    }
}

/// Where the analysis service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5000/api";

    /// `base_url` is the API root, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// Server-local ISO 8601 timestamp.
    pub timestamp: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Pull the `error` message out of a failure body, if it has one.
fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()?
        .error
        .filter(|m| !m.trim().is_empty())
}

/// Client for the analysis service. Uses the transport's default timeouts
/// and never retries.
pub struct AnalysisClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl AnalysisClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a file as the `file` field of a multipart form to `POST /upload`.
    ///
    /// The part carries the canonical MIME type of the file's kind, not the
    /// declared one. Files the upload policy rejects are never sent.
    pub async fn upload(&self, file: &CandidateFile) -> Result<AnalysisResult, ClientError> {
        let kind = validate(file)?;
        let path = file
            .path
            .as_ref()
            .ok_or_else(|| ClientError::NoContents(file.name.clone()))?;
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.clone(),
            source,
        })?;

        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(kind.mime_type())?;
        let form = Form::new().part("file", part);

        let url = self.config.endpoint("upload");
        info!(url = %url, file = %file.name, bytes = file.byte_size, "uploading document");
        let resp = self.client.post(&url).multipart(form).send().await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            let message = server_message(&body);
            warn!(status = status.as_u16(), message = ?message, "upload rejected by server");
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let result: AnalysisResult = serde_json::from_str(&body)?;
        info!(
            file = %result.filename,
            clauses = result.clauses.len(),
            "analysis received"
        );
        Ok(result)
    }

    /// Probe `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.config.endpoint("health");
        info!(url = %url, "checking service health");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait(?Send)]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, file: &CandidateFile) -> Result<AnalysisResult, UploadError> {
        self.upload(file).await.map_err(|err| {
            warn!(error = %err, "upload failed");
            UploadError::from(err)
        })
    }
}
