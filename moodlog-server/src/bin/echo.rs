use anyhow::Context;
use clap::Parser;
use moodlog_core::MoodlogConfig;
use tokio::sync::broadcast;

use moodlog_server::{echo, logging};

#[derive(Parser, Debug)]
#[command(author, version, about = "moodlog transcription echo service", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "moodlog.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = MoodlogConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    logging::init(&config.service.log_level);

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            let _ = shutdown_tx.send(());
        }
    });

    echo::start_echo_server(&config.echo.addr(), tx.subscribe()).await
}
