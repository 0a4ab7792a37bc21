//! Client orchestrator: drives upload → analyze from one user action.
//!
//! `session` holds the state machine, `gateway` the HTTP calls, `prompt` the
//! user interaction seam (alerts and confirmations), `render` the text output.

pub mod gateway;
pub mod prompt;
pub mod render;
pub mod session;

use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;

pub use gateway::{ClientError, Gateway, HttpGateway};
pub use prompt::{Prompter, TerminalPrompter};
pub use session::{Session, SessionEvent, SessionOutput, SessionState, TransitionError};

/// A document selected by the user: declared filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub bytes: Bytes,
}

impl Document {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(filename, bytes))
    }
}
