pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_analyze;
use crate::ingest::handlers::handle_upload;
use crate::state::AppState;

/// Headroom above the file limit for multipart boundaries and headers.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = match state.config.max_upload_bytes {
        Some(max) => DefaultBodyLimit::max(max.saturating_add(MULTIPART_OVERHEAD_BYTES)),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/upload", post(handle_upload).layer(upload_limit))
        .route("/analyze", post(handle_analyze))
        .with_state(state)
}
