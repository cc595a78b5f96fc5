use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use improver_agent::OpenAiProvider;
use improver_core::config::ImproverConfig;
use improver_telegram::TelegramAdapter;

mod app;

#[derive(Parser)]
#[command(name = "improver-bot")]
#[command(about = "Telegram bot that corrects English text and lists what was wrong")]
struct Args {
    /// Path to improver.toml (defaults to ~/.improver/improver.toml)
    #[arg(short, long, env = "IMPROVER_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "improver_bot=info,improver_telegram=info,improver_agent=info".into()
            }),
        )
        .init();

    let args = Args::parse();

    // load config: --config / IMPROVER_CONFIG > ~/.improver/improver.toml, then env overrides
    let config = ImproverConfig::load(args.config.as_deref()).map_err(|e| {
        tracing::error!(code = e.code(), "configuration rejected: {e}");
        e
    })?;

    info!(
        model = %config.openai.model,
        base_url = %config.openai.base_url,
        max_workers = config.telegram.max_workers,
        "Starting {}",
        config.bot.name
    );

    let provider = OpenAiProvider::new(
        config.openai.api_key.clone(),
        Some(config.openai.base_url.clone()),
    );
    let telegram = config.telegram.clone();
    let state = Arc::new(app::AppState::new(config, Box::new(provider)));

    let adapter = TelegramAdapter::new(&telegram, state)
        .context("failed to start Telegram adapter")?;
    adapter.run().await;

    info!("shutdown complete");
    Ok(())
}
