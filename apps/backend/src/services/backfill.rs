//! Batch pronunciation-audio generation for stored cards.
//!
//! Every card is processed on its own: a synthesis or store failure is
//! logged, recorded, and the batch moves on.

use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

use crate::db::CardStore;
use crate::error::Result;
use crate::services::speech::{SpeechKind, SpeechSynthesizer, VoiceRequest};

/// Which audio column to fill and which text column it is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioField {
    /// `phrase_audio` from `phrase`
    Phrase,
    /// `word_audio` from `word`
    Word,
}

impl AudioField {
    pub fn text_column(self) -> &'static str {
        match self {
            Self::Phrase => "phrase",
            Self::Word => "word",
        }
    }

    pub fn audio_column(self) -> &'static str {
        match self {
            Self::Phrase => "phrase_audio",
            Self::Word => "word_audio",
        }
    }

    fn speech_kind(self) -> SpeechKind {
        match self {
            Self::Phrase => SpeechKind::Phrase,
            Self::Word => SpeechKind::Word,
        }
    }
}

/// Card text awaiting audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAudio {
    pub id: i64,
    pub text: String,
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub success_count: usize,
    pub failed_ids: Vec<i64>,
}

pub struct AudioBackfill {
    store: Arc<dyn CardStore>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    language: String,
    voice: Option<String>,
}

impl AudioBackfill {
    pub fn new(
        store: Arc<dyn CardStore>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        language: impl Into<String>,
        voice: Option<String>,
    ) -> Self {
        Self {
            store,
            synthesizer,
            language: language.into(),
            voice,
        }
    }

    /// Fetch the cards for `field` and generate audio for each.
    ///
    /// Only a failure to list cards aborts the run.
    pub async fn run(&self, field: AudioField, include_existing: bool) -> Result<BatchReport> {
        let cards = self.store.pending_audio(field, include_existing).await?;
        tracing::info!("Generating {} for {} cards", field.audio_column(), cards.len());
        Ok(self.process(field, &cards).await)
    }

    /// Generate and store audio for each card independently.
    pub async fn process(&self, field: AudioField, cards: &[PendingAudio]) -> BatchReport {
        let mut report = BatchReport::default();
        let voice = VoiceRequest {
            language: self.language.clone(),
            voice: self.voice.clone(),
            kind: field.speech_kind(),
        };

        for (idx, card) in cards.iter().enumerate() {
            if card.text.trim().is_empty() {
                tracing::warn!("Skipping card {}: empty {}", card.id, field.text_column());
                report.failed_ids.push(card.id);
                continue;
            }

            let audio = match self.synthesizer.synthesize(&card.text, &voice).await {
                Ok(audio) => general_purpose::STANDARD.encode(audio),
                Err(e) => {
                    tracing::warn!("Failed to generate audio for card {}: {}", card.id, e);
                    report.failed_ids.push(card.id);
                    continue;
                }
            };

            match self.store.store_audio(card.id, field, &audio).await {
                Ok(()) => {
                    report.success_count += 1;
                    tracing::info!(
                        "[{}/{}] Updated card {} ({} chars)",
                        idx + 1,
                        cards.len(),
                        card.id,
                        audio.len()
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to store audio for card {}: {}", card.id, e);
                    report.failed_ids.push(card.id);
                }
            }
        }

        report
    }
}
