use teloxide::utils::command::BotCommands;

use crate::bot::event::Event;
use crate::bot::{callbacks, messages, session, AppState};
use crate::db::models::User;
use crate::tts::VoiceProvider;

#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum BotCommand {
    #[command(description = "Start / restart the bot")]
    Start,
    #[command(description = "Show help")]
    Help,
    #[command(description = "Set your Steos Voice API key")]
    ApiKey,
    #[command(description = "Choose a voice")]
    Voice,
    #[command(description = "Show remaining symbols")]
    Symbols,
}

impl BotCommand {
    /// Match the leading command token exactly, ignoring a `@botname`
    /// suffix and any arguments.
    pub fn from_text(text: &str) -> Option<Self> {
        let token = text.split_whitespace().next()?.strip_prefix('/')?;
        let name = token.split('@').next()?;
        match name {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "apikey" => Some(Self::ApiKey),
            "voice" => Some(Self::Voice),
            "symbols" => Some(Self::Symbols),
            _ => None,
        }
    }
}

pub async fn handle_command(
    state: &AppState,
    event: &Event,
    user: &User,
    cmd: BotCommand,
) -> anyhow::Result<()> {
    let chat_id = event.chat_id;

    match cmd {
        BotCommand::Start => {
            for text in messages::START_MESSAGES {
                tokio::time::sleep(state.settings.start_message_interval).await;
                state.reply(chat_id, text).await?;
            }
        }

        BotCommand::Help => {
            state
                .reply(chat_id, &BotCommand::descriptions().to_string())
                .await?;
        }

        BotCommand::ApiKey => match session::begin_api_key_entry(state.store.as_ref(), user).await {
            Ok(_) => state.reply(chat_id, messages::SET_API_KEY).await?,
            Err(e) => {
                tracing::error!("Failed to enter API key mode for chat {}: {:#}", chat_id, e);
                state.reply(chat_id, messages::SOMETHING_WENT_WRONG).await?;
            }
        },

        BotCommand::Voice => {
            if !user.has_api_key() {
                state.reply(chat_id, messages::NO_API_KEY).await?;
                return Ok(());
            }
            state.spawn_catalog_refresh(user);
            callbacks::show_catalog(state, chat_id, user, 1, None).await?;
        }

        BotCommand::Symbols => {
            if !user.has_api_key() {
                state.reply(chat_id, messages::NO_API_KEY).await?;
                return Ok(());
            }
            match state.provider.symbols(&user.api_key).await {
                Ok(resp) if resp.status => {
                    state
                        .reply(chat_id, &messages::symbol_count(resp.symbols))
                        .await?;
                }
                Ok(resp) => {
                    tracing::warn!("Symbol lookup refused for chat {}: {}", chat_id, resp.message);
                    state.reply(chat_id, messages::COMMAND_FAILED).await?;
                }
                Err(e) => {
                    tracing::error!("Symbol lookup failed for chat {}: {:#}", chat_id, e);
                    state.reply(chat_id, messages::COMMAND_FAILED).await?;
                }
            }
        }
    }

    Ok(())
}
