//! Document upload and retrieval endpoints

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::storage::RECENT_LIMIT;
use crate::AppState;

/// POST /upload_file
///
/// Expects a multipart form with a `file` field.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::Validation("No selected file".to_string()))?;
        let content = field
            .bytes()
            .await
            .map_err(multipart_error)?;

        let file = state.storage.save(&filename, &content).await?;
        return Ok(Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            file,
        }));
    }

    Err(ApiError::Validation("No file part".to_string()))
}

/// Oversized bodies are 413; any other malformed form is a validation error.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::Validation(e.body_text())
    }
}

/// GET /recent_files
pub async fn recent_files(State(state): State<AppState>) -> Result<Json<RecentFilesResponse>> {
    let files = state.storage.recent(RECENT_LIMIT).await?;
    Ok(Json(RecentFilesResponse { files }))
}

/// GET /open_file/:filename
pub async fn open_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse> {
    let (bytes, kind) = state.storage.open(&filename).await?;
    Ok(([(header::CONTENT_TYPE, kind.content_type())], bytes))
}
