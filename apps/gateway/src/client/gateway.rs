use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use thiserror::Error;

use super::Document;
use crate::analysis::{AnalysisRequest, AnalysisResult};
use crate::ingest::RESUME_FIELD;

/// Failure of one remote call, already reduced to the most specific message.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection-level failure; no response was received.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the server's `error` field if present.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// The two gateway endpoints the orchestrator calls.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// POST /upload. Returns the extracted text ("" when the server sends none).
    async fn upload(&self, document: &Document) -> Result<String, ClientError>;

    /// POST /analyze. Returns the decoded scoring result.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ClientError>;
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: Option<String>,
}

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn upload(&self, document: &Document) -> Result<String, ClientError> {
        let part = Part::bytes(document.bytes.to_vec()).file_name(document.filename.clone());
        let form = Form::new().part(RESUME_FIELD, part);

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;
        let body = success_body(response).await?;

        let reply: UploadReply =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(reply.text.unwrap_or_default())
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ClientError> {
        let response = self
            .client
            .post(self.url("/analyze"))
            .json(request)
            .send()
            .await?;
        let body = success_body(response).await?;

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

async fn success_body(response: Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    Err(ClientError::Server {
        status: status.as_u16(),
        message: server_message(status.as_u16(), &body),
    })
}

/// The server's `error` string if the body carries one, else a generic status line.
pub fn server_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorReply>(body)
        .ok()
        .and_then(|reply| reply.error)
        .unwrap_or_else(|| format!("Request failed with status code {status}"))
}
