//! Database models and API types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Re-export shared types from card-core
pub use card_core::types::{Explanation, Flashcard, LanguageCard, Mode, Parsed};

use crate::services::speech::SpeechKind;
use crate::services::storage::StoredFile;

// === Database Entity Types ===

/// Card stored in PostgreSQL. Audio payloads are not loaded, only their presence.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredCard {
    pub id: i64,
    pub word: String,
    pub phrase: String,
    pub translation: String,
    pub answer: String,
    pub has_word_audio: bool,
    pub has_phrase_audio: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// === API Request/Response Types ===

/// Generate request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Mode name; validated by the handler so unknown names get a clear error.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Generate response, shaped by mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GenerateResponse {
    Flashcards { flashcards: Vec<Flashcard> },
    Language { flashcard: LanguageCard },
    Explanation { explanation: String },
}

impl From<Parsed> for GenerateResponse {
    fn from(parsed: Parsed) -> Self {
        match parsed {
            Parsed::Flashcards(flashcards) => Self::Flashcards { flashcards },
            Parsed::Language(flashcard) => Self::Language { flashcard },
            Parsed::Explanation(Explanation { explanation }) => Self::Explanation { explanation },
        }
    }
}

/// Models response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub default: String,
}

/// IPA request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpaRequest {
    pub word: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Extra languages to transcribe independently.
    #[serde(default)]
    pub languages: Vec<String>,
}

/// IPA response. On failure `ipa` is empty and `error` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpaResponse {
    pub ipa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub transcriptions: BTreeMap<String, LanguageTranscription>,
}

/// Per-language IPA result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageTranscription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Audio request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioRequest {
    pub word: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(rename = "type", default)]
    pub kind: SpeechKind,
    #[serde(default)]
    pub voice: Option<String>,
}

/// Audio response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioResponse {
    /// Base64-encoded mp3
    pub audio: String,
}

/// Upload response
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file: StoredFile,
}

/// Recent files response
#[derive(Debug, Clone, Serialize)]
pub struct RecentFilesResponse {
    pub files: Vec<StoredFile>,
}

/// Save card response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveCardResponse {
    pub id: i64,
}

fn default_language() -> String {
    "en".to_string()
}
