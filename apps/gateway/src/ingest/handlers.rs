use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extract_bounded;
use crate::ingest::staging::StagedUpload;
use crate::ingest::RESUME_FIELD;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /upload
///
/// Accepts a multipart form with a `resume` file field and returns its plain text.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!("Upload rejected before reading: {rejection}");
        AppError::MissingFile
    })?;

    let request_id = Uuid::new_v4();
    let staged = stage_resume_field(&state, request_id, &mut multipart)
        .await?
        .ok_or(AppError::MissingFile)?;

    let text = extract_staged(&state, staged).await?;
    Ok(Json(UploadResponse { text }))
}

// ────────────────────────────────────────────────────────────────────────────
// Staging and extraction
// ────────────────────────────────────────────────────────────────────────────

/// Streams the first `resume` field into transient storage; other fields are drained.
async fn stage_resume_field(
    state: &AppState,
    request_id: Uuid,
    multipart: &mut Multipart,
) -> Result<Option<StagedUpload>, AppError> {
    let limit = state.config.max_upload_bytes;
    let mut staged: Option<StagedUpload> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| field_error(e, limit))?
    {
        if staged.is_some() || field.name() != Some(RESUME_FIELD) {
            while field
                .chunk()
                .await
                .map_err(|e| field_error(e, limit))?
                .is_some()
            {}
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let mut upload = StagedUpload::create(&state.config.upload_dir, request_id, filename)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to stage upload: {e}")))?;
        copy_field(&mut field, &mut upload, limit).await?;
        staged = Some(upload);
    }

    Ok(staged)
}

async fn copy_field(
    field: &mut Field<'_>,
    upload: &mut StagedUpload,
    limit: Option<usize>,
) -> Result<(), AppError> {
    while let Some(chunk) = field.chunk().await.map_err(|e| field_error(e, limit))? {
        if let Some(limit) = limit {
            if upload.len() + chunk.len() > limit {
                return Err(AppError::PayloadTooLarge { limit });
            }
        }
        upload
            .append(&chunk)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to write upload: {e}")))?;
    }
    Ok(())
}

/// Resolves the adapter, extracts, and releases the staged file on every path.
async fn extract_staged(state: &AppState, mut staged: StagedUpload) -> Result<String, AppError> {
    let request_id = staged.request_id();

    let Some(extractor) = state.registry.resolve(staged.filename()) else {
        warn!(%request_id, filename = staged.filename(), "Unsupported upload format");
        staged.discard();
        return Err(AppError::UnsupportedFormat(
            state.registry.unsupported_message(),
        ));
    };

    info!(
        %request_id,
        filename = staged.filename(),
        extractor = extractor.name(),
        bytes = staged.len(),
        "Extracting uploaded document"
    );

    let outcome = match staged.read_all().await {
        Ok(bytes) => extract_bounded(extractor, bytes, state.config.extraction_timeout)
            .await
            .map_err(AppError::from),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "failed to read staged upload: {e}"
        ))),
    };
    staged.discard();

    let text = outcome?;
    info!(%request_id, text_len = text.len(), "Extraction complete");
    Ok(text)
}

fn field_error(err: MultipartError, limit: Option<usize>) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Upload body exceeded the configured limit: {err}");
        return AppError::PayloadTooLarge {
            limit: limit.unwrap_or_default(),
        };
    }
    AppError::MalformedUpload(err.body_text())
}
