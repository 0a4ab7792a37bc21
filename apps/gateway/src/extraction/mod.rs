//! Text extraction: format adapters plus the registry that selects them.
//!
//! Adapters are synchronous and CPU-bound. `extract_bounded` runs one on the
//! blocking pool under a deadline so a pathological document cannot stall
//! the request forever, and a panicking parser cannot take the server down.

pub mod docx;
pub mod pdf;
pub mod registry;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

pub use registry::{ExtractorRegistry, FormatTag};

/// Adapter-level failure: the document could not be parsed.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document part '{0}' is missing")]
    MissingPart(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of one bounded extraction run.
#[derive(Debug, Error)]
pub enum ExtractionRunError {
    #[error(transparent)]
    Adapter(#[from] ExtractError),

    #[error("extractor '{0}' panicked")]
    Panicked(&'static str),

    #[error("extraction exceeded {0:?}")]
    TimedOut(Duration),
}

/// A format-specific text extraction capability.
pub trait Extractor: Send + Sync {
    /// Short machine name, used in logs.
    fn name(&self) -> &'static str;

    /// Human-facing format label ("PDF", "DOCX").
    fn label(&self) -> &'static str;

    /// Converts raw document bytes to plain text. Blank documents yield "".
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Runs `extractor` on the blocking pool with an upper bound on wall time.
///
/// On timeout the blocking task is left to finish on its own; its output is
/// discarded. It only holds its own copy of the bytes.
pub async fn extract_bounded(
    extractor: Arc<dyn Extractor>,
    bytes: Vec<u8>,
    limit: Duration,
) -> Result<String, ExtractionRunError> {
    let name = extractor.name();
    let task = tokio::task::spawn_blocking(move || extractor.extract(&bytes));

    match tokio::time::timeout(limit, task).await {
        Err(_) => Err(ExtractionRunError::TimedOut(limit)),
        Ok(Err(join_err)) => {
            tracing::error!("Extractor '{name}' aborted: {join_err}");
            Err(ExtractionRunError::Panicked(name))
        }
        Ok(Ok(result)) => Ok(result?),
    }
}
