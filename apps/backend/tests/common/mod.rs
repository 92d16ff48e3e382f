//! Common test utilities and fixtures for integration tests.
//!
//! The router is built with in-process fakes for the completion gateway,
//! speech synthesizer and card store, a small IPA dictionary, and a
//! temporary upload directory. No network or database is needed.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use parking_lot::Mutex;
use tempfile::TempDir;

use readcards_backend::config::ModelRegistry;
use readcards_backend::db::CardStore;
use readcards_backend::error::{ApiError, Result};
use readcards_backend::models::{LanguageCard, StoredCard};
use readcards_backend::services::backfill::{AudioField, PendingAudio};
use readcards_backend::services::completion::{
    CompletionError, CompletionGateway, CompletionRequest,
};
use readcards_backend::services::orchestrator::Orchestrator;
use readcards_backend::services::speech::{
    DictionaryTranscriber, SpeechError, SpeechSynthesizer, VoiceRequest,
};
use readcards_backend::services::storage::StorageService;
use readcards_backend::AppState;

/// Upload limit used by the test router.
pub const TEST_UPLOAD_LIMIT: usize = 64 * 1024;

/// What the fake gateway answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    RateLimited,
    Hang,
}

/// Completion gateway that records requests and returns a canned reply.
pub struct FakeGateway {
    reply: Mutex<Reply>,
    pub seen: Mutex<Vec<CompletionRequest>>,
}

impl FakeGateway {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply: Mutex::new(reply),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock() = reply;
    }
}

#[async_trait]
impl CompletionGateway for FakeGateway {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, CompletionError> {
        self.seen.lock().push(request.clone());
        let reply = self.reply.lock().clone();
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::RateLimited => Err(CompletionError::RateLimited),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(String::new())
            }
        }
    }
}

/// Synthesizer that "speaks" by echoing the text bytes. Fails on `"fail"`.
pub struct EchoSynthesizer {
    pub seen: Mutex<Vec<VoiceRequest>>,
}

#[async_trait]
impl SpeechSynthesizer for EchoSynthesizer {
    async fn synthesize(&self, text: &str, voice: &VoiceRequest) -> std::result::Result<Vec<u8>, SpeechError> {
        self.seen.lock().push(voice.clone());
        if text == "fail" {
            return Err(SpeechError::Backend("throttled".to_string()));
        }
        Ok(text.as_bytes().to_vec())
    }
}

/// In-memory card store.
#[derive(Default)]
pub struct MemoryStore {
    pub cards: Mutex<Vec<LanguageCard>>,
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn insert_card(&self, card: &LanguageCard) -> Result<i64> {
        let mut cards = self.cards.lock();
        cards.push(card.clone());
        Ok(cards.len() as i64)
    }

    async fn get_card(&self, id: i64) -> Result<Option<StoredCard>> {
        let cards = self.cards.lock();
        let Some(card) = usize::try_from(id - 1).ok().and_then(|idx| cards.get(idx)) else {
            return Ok(None);
        };
        let now = chrono::Utc::now();
        Ok(Some(StoredCard {
            id,
            word: card.word.clone(),
            phrase: card.question.clone(),
            translation: card.translation.clone(),
            answer: card.answer.clone(),
            has_word_audio: false,
            has_phrase_audio: false,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn pending_audio(&self, _field: AudioField, _include_existing: bool) -> Result<Vec<PendingAudio>> {
        Ok(Vec::new())
    }

    async fn store_audio(&self, id: i64, _field: AudioField, _audio_base64: &str) -> Result<()> {
        Err(ApiError::NotFound(format!("Card {}", id)))
    }
}

/// Test context holding the router and handles on its fakes.
pub struct TestContext {
    pub gateway: Arc<FakeGateway>,
    pub synthesizer: Arc<EchoSynthesizer>,
    pub store: Arc<MemoryStore>,
    pub uploads: TempDir,
    app: Router,
}

impl TestContext {
    /// Context whose gateway answers `reply` and whose models have a configured key.
    pub async fn new(reply: Reply) -> Self {
        Self::build(reply, Some("configured-key"), true).await
    }

    /// Context with no credentials configured for any model.
    pub async fn without_credentials(reply: Reply) -> Self {
        Self::build(reply, None, true).await
    }

    /// Context with no datastore.
    pub async fn without_datastore() -> Self {
        Self::build(Reply::Text(String::new()), Some("configured-key"), false).await
    }

    async fn build(reply: Reply, key: Option<&str>, with_store: bool) -> Self {
        let key = key.map(str::to_string);
        let registry = ModelRegistry::from_toml_str(fixtures::MODELS_TOML, move |_| key.clone())
            .expect("Failed to parse test models");

        let gateway = Arc::new(FakeGateway::new(reply));
        let orchestrator = Orchestrator::new(
            gateway.clone(),
            Arc::new(registry),
            Duration::from_millis(200),
            512,
        );

        let transcriber = DictionaryTranscriber::empty()
            .with_dictionary("en_US", fixtures::EN_DICTIONARY)
            .with_dictionary("fr_FR", fixtures::FR_DICTIONARY);
        let synthesizer = Arc::new(EchoSynthesizer {
            seen: Mutex::new(Vec::new()),
        });
        let store = Arc::new(MemoryStore::default());

        let uploads = tempfile::tempdir().expect("Failed to create upload dir");
        let storage = StorageService::new(uploads.path())
            .await
            .expect("Failed to initialize storage");

        let state = AppState {
            orchestrator: Arc::new(orchestrator),
            transcriber: Arc::new(transcriber),
            synthesizer: synthesizer.clone(),
            storage: Arc::new(storage),
            cards: if with_store {
                Some(store.clone() as Arc<dyn CardStore>)
            } else {
                None
            },
        };

        let app = readcards_backend::router(state, TEST_UPLOAD_LIMIT);

        Self {
            gateway,
            synthesizer,
            store,
            uploads,
            app,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}
