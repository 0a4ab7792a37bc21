use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::analysis::AnalysisRequest;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Raw body as sent by the client; both fields optional until validated.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeBody {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub jd_text: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
///
/// Validates the pair locally, then relays the scoring service's reply verbatim.
/// An unparseable body is treated the same as one with both fields missing.
pub async fn handle_analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = body.map(|Json(body)| body).unwrap_or_else(|rejection| {
        warn!("Unreadable /analyze body: {rejection}");
        AnalyzeBody::default()
    });

    let request = AnalysisRequest::from_parts(body.resume_text, body.jd_text)?;

    info!(
        resume_len = request.resume_text.len(),
        jd_len = request.jd_text.len(),
        "Forwarding analysis request"
    );
    let result = state.scoring.analyze(&request).await?;
    Ok(Json(result))
}
