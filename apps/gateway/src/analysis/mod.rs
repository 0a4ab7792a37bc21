//! Analysis forwarding: validates a (resume_text, jd_text) pair and relays it
//! to the external scoring service.

pub mod handlers;
pub mod scoring_client;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const MISSING_FIELDS_MESSAGE: &str = "resume_text and jd_text are required in body";

/// A validated scoring request. Both fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub jd_text: String,
}

impl AnalysisRequest {
    /// Rejects absent or empty fields before any network call is made.
    /// Whitespace-only text is passed on; the scoring service decides what it means.
    pub fn from_parts(
        resume_text: Option<String>,
        jd_text: Option<String>,
    ) -> Result<Self, AppError> {
        match (non_empty(resume_text), non_empty(jd_text)) {
            (Some(resume_text), Some(jd_text)) => Ok(Self {
                resume_text,
                jd_text,
            }),
            _ => Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string())),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Scoring service output. The gateway relays the raw payload; this typed
/// view is what the client decodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Match percentage, 0–100. The scoring service may send fractional values.
    pub score: f64,
    pub missing_skills: Vec<String>,
    pub jd_keywords: Vec<String>,
    pub resume_keywords: Vec<String>,
    pub suggestions: Vec<String>,
}
