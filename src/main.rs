use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing_subscriber::EnvFilter;

mod bot;
mod config;
mod db;
#[cfg(test)]
mod testing;
mod tts;

use bot::commands::BotCommand;
use bot::transport::TelegramTransport;
use config::{AppConfig, BotSettings};
use db::Database;
use tts::catalog::VoiceCatalog;
use tts::steos::SteosVoiceClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🗣 Starting narrator bot...");

    // Load config
    let config = AppConfig::from_env()?;
    tracing::info!("Config loaded. Steos Voice API: {}", config.steos_api_url);

    // Initialize database
    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    db.run_migrations().await?;
    tracing::info!("Database connected and migrations applied.");

    // Create the Telegram bot
    let bot = Bot::new(&config.telegram_bot_token);
    if let Err(e) = bot.set_my_commands(BotCommand::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    // The voice cache lives for the whole process and is never persisted
    let provider = Arc::new(SteosVoiceClient::new(&config));
    let state = Arc::new(bot::AppState {
        settings: BotSettings::from(&config),
        store: Arc::new(db),
        provider: provider.clone(),
        catalog: Arc::new(VoiceCatalog::new(provider)),
        transport: Arc::new(TelegramTransport::new(bot.clone())),
    });

    // Build the dispatcher
    let handler = bot::build_handler();

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
