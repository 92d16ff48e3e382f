//! Saved language cards

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::db::CardStore;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

fn card_store(state: &AppState) -> Result<&Arc<dyn CardStore>> {
    state
        .cards
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("datastore not configured".to_string()))
}

/// POST /collection
pub async fn save_card(
    State(state): State<AppState>,
    Json(card): Json<LanguageCard>,
) -> Result<Json<SaveCardResponse>> {
    let store = card_store(&state)?;

    if card.word.trim().is_empty() && card.question.trim().is_empty() {
        return Err(ApiError::Validation(
            "card needs a word or a question".to_string(),
        ));
    }

    let id = store.insert_card(&card).await?;
    tracing::info!("Saved card {} ({})", id, card.word);
    Ok(Json(SaveCardResponse { id }))
}

/// GET /collection/:id
pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StoredCard>> {
    let store = card_store(&state)?;
    let card = store
        .get_card(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Card {}", id)))?;
    Ok(Json(card))
}
