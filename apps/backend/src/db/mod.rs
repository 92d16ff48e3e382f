//! PostgreSQL database operations

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::error::{ApiError, Result};
use crate::models::{LanguageCard, StoredCard};
use crate::services::backfill::{AudioField, PendingAudio};

/// Card persistence used by the collection routes and the audio backfill.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Insert a language card, returning its ID.
    async fn insert_card(&self, card: &LanguageCard) -> Result<i64>;

    /// Get a stored card by ID
    async fn get_card(&self, id: i64) -> Result<Option<StoredCard>>;

    /// Cards with non-empty text for `field`; with `include_existing` false,
    /// only those whose audio is still missing.
    async fn pending_audio(&self, field: AudioField, include_existing: bool) -> Result<Vec<PendingAudio>>;

    /// Store base64 audio for one card.
    async fn store_audio(&self, id: i64, field: AudioField, audio_base64: &str) -> Result<()>;
}

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl CardStore for Database {
    /// The question is stored as the phrase.
    async fn insert_card(&self, card: &LanguageCard) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO flashcards (word, phrase, translation, answer)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&card.word)
        .bind(&card.question)
        .bind(&card.translation)
        .bind(&card.answer)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    async fn get_card(&self, id: i64) -> Result<Option<StoredCard>> {
        let card = sqlx::query_as::<_, StoredCard>(
            r#"
            SELECT id, word, phrase, translation, answer,
                   word_audio IS NOT NULL AND word_audio <> '' AS has_word_audio,
                   phrase_audio IS NOT NULL AND phrase_audio <> '' AS has_phrase_audio,
                   created_at, updated_at
            FROM flashcards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    async fn pending_audio(&self, field: AudioField, include_existing: bool) -> Result<Vec<PendingAudio>> {
        let text = field.text_column();
        let audio = field.audio_column();
        let missing_filter = if include_existing {
            String::new()
        } else {
            format!("AND ({audio} IS NULL OR {audio} = '')")
        };

        let rows = sqlx::query(&format!(
            r#"
            SELECT id, {text} AS text
            FROM flashcards
            WHERE {text} IS NOT NULL AND {text} <> '' {missing_filter}
            ORDER BY id
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PendingAudio {
                id: row.get("id"),
                text: row.get("text"),
            })
            .collect())
    }

    async fn store_audio(&self, id: i64, field: AudioField, audio_base64: &str) -> Result<()> {
        let audio = field.audio_column();
        let result = sqlx::query(&format!(
            "UPDATE flashcards SET {audio} = $1, updated_at = NOW() WHERE id = $2"
        ))
        .bind(audio_base64)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Card {}", id)));
        }
        Ok(())
    }
}
