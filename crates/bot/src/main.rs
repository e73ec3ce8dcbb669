//! Access-gated Telegram chat bot.
//!
//! Run with: cargo run -p bot --bin magabot
//!
//! Configuration via .env file or environment variables:
//!   BOT_TOKEN           - Telegram bot token (required)
//!   OPENROUTER_API_KEY  - Completion API key (required)
//!   SQLITE_PATH         - Database URL (default: sqlite:magabot.db?mode=rwc)
//!   ADMIN_ID            - Telegram user id allowed to /grant
//!   RUST_LOG            - Log filter (default: info)

use std::sync::Arc;

use bot::{classify, dispatch, AppConfig, TelegramSender};
use database::Database;
use futures::StreamExt;
use openrouter_brain::OpenRouterBrain;
use orchestrator::Orchestrator;
use telegram_client::{subscribe, ReconnectConfig, TelegramClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let client = TelegramClient::new(config.telegram.clone())?;
    let me = client.get_me().await?;
    info!(
        "Connected to Telegram as @{}",
        me.username.as_deref().unwrap_or("unknown")
    );

    let brain = OpenRouterBrain::new(config.brain.clone())?;
    let sender = TelegramSender::new(client.clone());
    let orchestrator = Arc::new(Orchestrator::new(
        db.clone(),
        brain,
        sender,
        config.orchestrator.clone(),
    ));

    info!("Bot is running. Press Ctrl+C to stop.");

    let mut updates = subscribe(client, ReconnectConfig::default());
    loop {
        tokio::select! {
            update = updates.next() => {
                let Some(update) = update else {
                    warn!("Update stream ended");
                    break;
                };
                let Some(event) = classify(&update) else {
                    continue;
                };

                let orchestrator = orchestrator.clone();
                tokio::spawn(async move {
                    dispatch(&orchestrator, event).await;
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    db.close().await;
    Ok(())
}
