//! Pronunciation services: IPA transcription and speech synthesis.

mod ipa;
mod polly;

pub use ipa::DictionaryTranscriber;
pub use polly::PollySynthesizer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("no transcription found for '{0}'")]
    NoTranscription(String),

    #[error("nothing to synthesize")]
    EmptyText,

    #[error("speech backend error: {0}")]
    Backend(String),

    #[error("failed to load dictionary {path}: {reason}")]
    Dictionary { path: String, reason: String },
}

/// Whether the text is a single word or a longer phrase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechKind {
    Word,
    #[default]
    Phrase,
}

/// Voice selection for one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceRequest {
    pub language: String,
    pub voice: Option<String>,
    pub kind: SpeechKind,
}

/// Converts text into IPA.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, text: &str, language: &str) -> Result<String, SpeechError>;

    /// Transcribe into each language independently; one failure never
    /// prevents the others.
    fn transcribe_many(
        &self,
        text: &str,
        languages: &[String],
    ) -> Vec<(String, Result<String, SpeechError>)> {
        languages
            .iter()
            .map(|language| (language.clone(), self.transcribe(text, language)))
            .collect()
    }
}

/// Converts text into encoded audio (mp3).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &VoiceRequest) -> Result<Vec<u8>, SpeechError>;
}

/// Normalise a language tag to `ll_RR` form (`en-us` becomes `en_US`).
pub fn normalize_language(language: &str) -> String {
    let language = language.trim().replace('-', "_");
    match language.split_once('_') {
        Some((lang, region)) => format!("{}_{}", lang.to_ascii_lowercase(), region.to_ascii_uppercase()),
        None => language.to_ascii_lowercase(),
    }
}

/// Primary subtag of a language tag (`en_US` becomes `en`).
pub fn primary_subtag(language: &str) -> &str {
    language.split(['_', '-']).next().unwrap_or(language)
}
