use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use moodlog_core::speech::SpeechConfig;
use moodlog_core::{EntryStore, HttpSpeechRecognizer, LexiconScorer, MoodlogConfig};
use tokio::sync::broadcast;

use moodlog_server::http::{self, JournalState};
use moodlog_server::logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "moodlog journal service", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "moodlog.toml")]
    config: String,

    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let config = MoodlogConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    logging::init(&config.service.log_level);

    // Open DB and make sure the entries table exists
    let pool = moodlog_core::db::create_pool(&config.database)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;
    moodlog_core::db::init_schema(&pool).await?;

    if args.health {
        match moodlog_core::db::health_check(&pool).await {
            Ok(v) => println!("✅ SQLite connected: {}", v),
            Err(e) => {
                println!("❌ SQLite check failed: {}", e);
                std::process::exit(1);
            }
        }
        println!("✅ moodlog DB health check passed");
        return Ok(());
    }

    let recognizer = HttpSpeechRecognizer::new(SpeechConfig::from(&config.speech))?;
    if config.speech.api_key.is_empty() {
        tracing::warn!("No speech API key configured; /transcribe requests may be rejected upstream");
    }

    let state = Arc::new(JournalState {
        store: EntryStore::new(pool, Arc::new(LexiconScorer::new())),
        recognizer: Arc::new(recognizer),
    });

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    http::start_http_server(state, &config.http.addr(), tx.subscribe()).await?;

    Ok(())
}
