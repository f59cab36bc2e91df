use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub database_max_connections: u32,

    /// Base URL of the Steos Voice API, without a trailing slash
    pub steos_api_url: String,
    /// Audio format requested from the synthesis endpoint
    pub speech_format: String,

    /// Delay before each message of the /start onboarding sequence
    pub start_message_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let interval_ms: u64 = std::env::var("START_MESSAGE_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()?;

        Ok(Self {
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN")?,
            database_url: std::env::var("DATABASE_URL")?,
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            steos_api_url: std::env::var("STEOS_API_URL")
                .unwrap_or_else(|_| "https://api.voice.steos.io/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            speech_format: std::env::var("SPEECH_FORMAT").unwrap_or_else(|_| "mp3".to_string()),
            start_message_interval: Duration::from_millis(interval_ms),
        })
    }
}

/// The subset of configuration the conversation handlers need.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub start_message_interval: Duration,
}

impl From<&AppConfig> for BotSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            start_message_interval: config.start_message_interval,
        }
    }
}
