//! Generate pronunciation audio for stored cards.
//!
//! By default fills `phrase_audio` for cards that have none.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use readcards_backend::db::Database;
use readcards_backend::services::backfill::{AudioBackfill, AudioField};
use readcards_backend::services::speech::PollySynthesizer;

#[derive(Debug, Parser)]
#[command(name = "backfill-audio", about = "Generate Polly audio for saved flashcards")]
struct Args {
    /// Fill word_audio from word instead of phrase_audio from phrase
    #[arg(long)]
    word_audio: bool,

    /// Regenerate audio even where it already exists
    #[arg(long)]
    all: bool,

    /// Polly voice
    #[arg(long, default_value = "Joanna")]
    voice: String,

    /// Language tag passed to the synthesizer
    #[arg(long, default_value = "en")]
    language: String,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    region: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let field = if args.word_audio {
        AudioField::Word
    } else {
        AudioField::Phrase
    };

    let db = Database::connect(&args.database_url).await?;
    db.run_migrations().await?;

    let synthesizer = PollySynthesizer::new(&args.region, Some(args.voice.clone())).await;
    let backfill = AudioBackfill::new(
        Arc::new(db),
        Arc::new(synthesizer),
        args.language,
        Some(args.voice),
    );

    let report = backfill.run(field, args.all).await?;

    println!("Updated {} cards", report.success_count);
    if !report.failed_ids.is_empty() {
        println!(
            "Failed {} cards: {:?}",
            report.failed_ids.len(),
            report.failed_ids
        );
    }

    Ok(())
}
