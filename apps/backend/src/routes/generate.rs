//! Completion endpoints

use axum::{extract::State, http::HeaderMap, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::orchestrator;
use crate::AppState;

/// Header carrying a per-request provider key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// POST /generate_flashcard
pub async fn generate_flashcard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    let mode = match req.mode.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(name) => name
            .parse::<Mode>()
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        None => Mode::default(),
    };

    let credential = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    let parsed = state
        .orchestrator
        .handle(orchestrator::GenerateRequest {
            prompt: &req.prompt,
            mode,
            model: req.model.as_deref(),
            credential,
        })
        .await?;

    Ok(Json(parsed.into()))
}

/// GET /models
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let registry = state.orchestrator.registry();
    Json(ModelsResponse {
        models: registry.models().map(str::to_string).collect(),
        default: registry.default_model().to_string(),
    })
}
