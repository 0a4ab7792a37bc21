//! Ingestion endpoint: multipart upload → transient staging → extraction.

pub mod handlers;
pub mod staging;

/// Multipart field carrying the document.
pub const RESUME_FIELD: &str = "resume";
