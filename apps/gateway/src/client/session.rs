//! Analysis session state machine.
//!
//! ```text
//! Idle | Succeeded | Failed --Submit--> Validating
//! Validating --Rejected--> Idle
//! Validating --Validated--> Ingesting
//! Ingesting --Extracted--> Analyzing
//! Ingesting --ExtractedOnly--> Succeeded(extraction only)
//! Analyzing --Analyzed--> Succeeded(analysis)
//! Ingesting | Analyzing --Errored--> Failed
//! ```
//!
//! A session in `Validating`, `Ingesting` or `Analyzing` is in flight and
//! refuses a new submit. There is no cancel event.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::gateway::{ClientError, Gateway};
use super::prompt::Prompter;
use super::Document;
use crate::analysis::{AnalysisRequest, AnalysisResult};

pub const NO_DOCUMENT_MESSAGE: &str = "Choose a PDF or DOCX resume first.";
pub const NO_JD_QUESTION: &str = "No JD provided. Continue and only extract resume text?";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutput {
    /// The user confirmed proceeding without a job description.
    ExtractionOnly { resume_text: String },
    Analysis {
        resume_text: String,
        result: AnalysisResult,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Validating,
    Ingesting,
    Analyzing,
    Succeeded(SessionOutput),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Submit,
    Rejected,
    Validated,
    Extracted,
    ExtractedOnly { resume_text: String },
    Analyzed {
        resume_text: String,
        result: AnalysisResult,
    },
    Errored(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal transition: {event} while {state}")]
pub struct TransitionError {
    pub state: &'static str,
    pub event: &'static str,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Validating => "Validating",
            SessionState::Ingesting => "Ingesting",
            SessionState::Analyzing => "Analyzing",
            SessionState::Succeeded(_) => "Succeeded",
            SessionState::Failed(_) => "Failed",
        }
    }

    /// True while a session is in flight; the submit control is disabled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SessionState::Validating | SessionState::Ingesting | SessionState::Analyzing
        )
    }

    /// The transition table. Anything not listed is illegal.
    pub fn next(&self, event: SessionEvent) -> Result<SessionState, TransitionError> {
        use SessionEvent as E;
        use SessionState as S;

        let next = match (self, event) {
            (S::Idle | S::Succeeded(_) | S::Failed(_), E::Submit) => S::Validating,
            (S::Validating, E::Rejected) => S::Idle,
            (S::Validating, E::Validated) => S::Ingesting,
            (S::Ingesting, E::Extracted) => S::Analyzing,
            (S::Ingesting, E::ExtractedOnly { resume_text }) => {
                S::Succeeded(SessionOutput::ExtractionOnly { resume_text })
            }
            (S::Analyzing, E::Analyzed { resume_text, result }) => {
                S::Succeeded(SessionOutput::Analysis { resume_text, result })
            }
            (S::Ingesting | S::Analyzing, E::Errored(message)) => S::Failed(message),
            (state, event) => {
                return Err(TransitionError {
                    state: state.name(),
                    event: event.name(),
                })
            }
        };
        Ok(next)
    }
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Submit => "Submit",
            SessionEvent::Rejected => "Rejected",
            SessionEvent::Validated => "Validated",
            SessionEvent::Extracted => "Extracted",
            SessionEvent::ExtractedOnly { .. } => "ExtractedOnly",
            SessionEvent::Analyzed { .. } => "Analyzed",
            SessionEvent::Errored(_) => "Errored",
        }
    }
}

/// One user's analysis session against a gateway.
pub struct Session {
    gateway: Arc<dyn Gateway>,
    prompter: Arc<dyn Prompter>,
    state: SessionState,
}

impl Session {
    pub fn new(gateway: Arc<dyn Gateway>, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            gateway,
            prompter,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn apply(&mut self, event: SessionEvent) -> Result<(), TransitionError> {
        let next = self.state.next(event)?;
        debug!("session: {} -> {}", self.state.name(), next.name());
        self.state = next;
        Ok(())
    }

    /// Runs one full session for the submit action and returns the final state.
    ///
    /// Guard failures (no document, declined empty-JD confirmation) leave the
    /// session `Idle` without any network call. Every remote failure ends in
    /// `Failed` and is reported through the prompter.
    pub async fn submit(
        &mut self,
        document: Option<&Document>,
        jd_text: &str,
    ) -> Result<&SessionState, TransitionError> {
        self.apply(SessionEvent::Submit)?;

        let Some(document) = document else {
            self.prompter.alert(NO_DOCUMENT_MESSAGE);
            self.apply(SessionEvent::Rejected)?;
            return Ok(&self.state);
        };

        let extraction_only = jd_text.is_empty();
        if extraction_only && !self.prompter.confirm(NO_JD_QUESTION) {
            self.apply(SessionEvent::Rejected)?;
            return Ok(&self.state);
        }

        self.apply(SessionEvent::Validated)?;
        let gateway = Arc::clone(&self.gateway);
        let resume_text = match gateway.upload(document).await {
            Ok(text) => text,
            Err(err) => return self.fail(err),
        };

        if extraction_only {
            self.apply(SessionEvent::ExtractedOnly { resume_text })?;
            return Ok(&self.state);
        }

        self.apply(SessionEvent::Extracted)?;
        let request = AnalysisRequest {
            resume_text,
            jd_text: jd_text.to_string(),
        };
        match gateway.analyze(&request).await {
            Ok(result) => {
                self.apply(SessionEvent::Analyzed {
                    resume_text: request.resume_text,
                    result,
                })?;
                Ok(&self.state)
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: ClientError) -> Result<&SessionState, TransitionError> {
        let message = err.to_string();
        self.prompter.alert(&format!("Error: {message}"));
        self.apply(SessionEvent::Errored(message))?;
        Ok(&self.state)
    }
}
