pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, ModelRegistry};
use crate::db::{CardStore, Database};
use crate::services::completion::HttpCompletionGateway;
use crate::services::orchestrator::Orchestrator;
use crate::services::speech::{
    DictionaryTranscriber, PollySynthesizer, SpeechSynthesizer, Transcriber,
};
use crate::services::storage::StorageService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub transcriber: Arc<dyn Transcriber>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub storage: Arc<StorageService>,
    /// None when no datastore is configured.
    pub cards: Option<Arc<dyn CardStore>>,
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!("Loading models from {}...", config.models_config.display());
    let registry = ModelRegistry::load(&config.models_config)?;
    tracing::info!("Default model: {}", registry.default_model());

    let cards: Option<Arc<dyn CardStore>> = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let db = Database::connect(url).await?;

            tracing::info!("Running migrations...");
            db.run_migrations().await?;
            Some(Arc::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; /collection is disabled");
            None
        }
    };

    let transcriber = match &config.ipa_dict_dir {
        Some(dir) => {
            let transcriber = DictionaryTranscriber::load_dir(dir)?;
            tracing::info!(
                "Loaded IPA dictionaries: {}",
                transcriber.languages().collect::<Vec<_>>().join(", ")
            );
            transcriber
        }
        None => {
            tracing::warn!("IPA_DICT_DIR not set; IPA lookups will fail");
            DictionaryTranscriber::empty()
        }
    };

    tracing::info!("Initializing Polly in {}...", config.aws_region);
    let synthesizer = PollySynthesizer::new(&config.aws_region, config.polly_voice.clone()).await;

    let storage = StorageService::new(&config.upload_dir).await?;

    let orchestrator = Orchestrator::new(
        Arc::new(HttpCompletionGateway::new()),
        Arc::new(registry),
        config.llm_timeout,
        config.llm_max_tokens,
    );

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        transcriber: Arc::new(transcriber),
        synthesizer: Arc::new(synthesizer),
        storage: Arc::new(storage),
        cards,
    };

    let app = router(state, config.max_upload_bytes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// All routes, without the CORS and tracing layers.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Generation
        .route("/generate_flashcard", post(routes::generate::generate_flashcard))
        .route("/models", get(routes::generate::list_models))
        // Pronunciation
        .route("/get_ipa", post(routes::speech::get_ipa))
        .route("/get_audio", post(routes::speech::get_audio))
        // Documents
        .route(
            "/upload_file",
            post(routes::files::upload_file).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/recent_files", get(routes::files::recent_files))
        .route("/open_file/:filename", get(routes::files::open_file))
        // Collection
        .route("/collection", post(routes::collection::save_card))
        .route("/collection/:id", get(routes::collection::get_card))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
