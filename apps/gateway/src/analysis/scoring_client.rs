//! Scoring service client. The only code that talks to the external scorer.
//!
//! One attempt per call, bounded by the configured timeout. Retrying is the
//! caller's decision.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use super::AnalysisRequest;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("scoring service responded with status {status}")]
    Status { status: u16, details: Value },

    #[error("scoring service returned an unreadable body: {0}")]
    InvalidBody(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl ScoringError {
    /// Downstream error payload if one was received, else the error text.
    pub fn details(&self) -> Value {
        match self {
            ScoringError::Status { details, .. } => details.clone(),
            other => json!(other.to_string()),
        }
    }
}

/// Seam between the forwarder and the scoring backend.
/// Carried in `AppState` as `Arc<dyn ScoringService>`.
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, ScoringError>;
}

/// HTTP scoring backend: `POST <base_url>/analyze` with the request as JSON.
#[derive(Clone)]
pub struct HttpScoringService {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpScoringService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ScoringError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScoringError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/analyze", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> ScoringError {
        if err.is_timeout() {
            ScoringError::Timeout(self.timeout)
        } else {
            ScoringError::Transport(err)
        }
    }
}

#[async_trait]
impl ScoringService for HttpScoringService {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, ScoringError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            let details = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
            return Err(ScoringError::Status {
                status: status.as_u16(),
                details,
            });
        }

        debug!("Scoring service replied {} ({} bytes)", status, body.len());
        serde_json::from_str(&body).map_err(|e| ScoringError::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client =
            HttpScoringService::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/analyze");
    }

    #[test]
    fn test_timeout_message_reports_millis() {
        let err = ScoringError::Timeout(Duration::from_secs(120));
        assert_eq!(err.to_string(), "timeout of 120000ms exceeded");
        assert_eq!(err.details(), json!("timeout of 120000ms exceeded"));
    }

    #[test]
    fn test_status_details_are_passed_through() {
        let err = ScoringError::Status {
            status: 503,
            details: json!({ "error": "model not loaded" }),
        };
        assert_eq!(err.details()["error"], "model not loaded");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        // Bind then release a port so nothing is listening on it.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            HttpScoringService::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
        let request = AnalysisRequest {
            resume_text: "resume".into(),
            jd_text: "jd".into(),
        };
        let err = client.analyze(&request).await.unwrap_err();
        assert!(matches!(err, ScoringError::Transport(_)), "got {err:?}");
    }
}
