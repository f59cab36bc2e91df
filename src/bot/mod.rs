pub mod callbacks;
pub mod commands;
pub mod event;
pub mod handlers;
pub mod keyboard;
pub mod messages;
pub mod session;
pub mod token;
pub mod transport;

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId};

use crate::config::BotSettings;
use crate::db::models::User;
use crate::db::UserStore;
use crate::tts::catalog::VoiceCatalog;
use crate::tts::VoiceProvider;
use event::Event;
use transport::ChatTransport;

type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Shared application state, accessible from all handlers.
pub struct AppState {
    pub settings: BotSettings,
    pub store: Arc<dyn UserStore>,
    pub provider: Arc<dyn VoiceProvider>,
    pub catalog: Arc<VoiceCatalog>,
    pub transport: Arc<dyn ChatTransport>,
}

impl AppState {
    pub async fn reply(&self, chat_id: ChatId, text: &str) -> anyhow::Result<()> {
        self.transport.send_text(chat_id, text, None).await
    }

    /// Replace text and keyboard of `edit`, or send a new message when there
    /// is nothing to edit. The keyboard is edited even when the text edit
    /// fails; the first error is returned.
    pub async fn show(
        &self,
        chat_id: ChatId,
        edit: Option<MessageId>,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> anyhow::Result<()> {
        let Some(message_id) = edit else {
            return self.transport.send_text(chat_id, text, Some(keyboard)).await;
        };

        let text_edit = self.transport.edit_text(chat_id, message_id, text).await;
        if let Err(e) = &text_edit {
            tracing::warn!("Failed to edit text of message {} in chat {}: {:#}", message_id.0, chat_id, e);
        }
        let keyboard_edit = self
            .transport
            .edit_keyboard(chat_id, message_id, keyboard)
            .await;
        text_edit.and(keyboard_edit)
    }

    /// Refetch the user's catalog in the background. Replies already sent or
    /// still pending are not ordered against it.
    pub fn spawn_catalog_refresh(&self, user: &User) {
        let catalog = self.catalog.clone();
        let chat_id = user.chat_id;
        let api_key = user.api_key.clone();
        tokio::spawn(async move {
            if let Err(e) = catalog.fetch_and_cache(chat_id, &api_key).await {
                tracing::warn!("Catalog refresh failed for chat {}: {}", chat_id, e);
            }
        });
    }
}

/// Build the teloxide update handler tree. Every update is handled on its own
/// task so a slow provider call never holds up intake.
pub fn build_handler() -> UpdateHandler<HandlerError> {
    let message_handler = Update::filter_message().endpoint(on_message);

    let callback_handler = Update::filter_callback_query().endpoint(on_callback);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}

async fn on_message(msg: Message, state: Arc<AppState>) -> Result<(), HandlerError> {
    let event = Event::from_message(&msg);
    tokio::spawn(async move { handlers::dispatch(&state, event).await });
    Ok(())
}

async fn on_callback(q: CallbackQuery, state: Arc<AppState>) -> Result<(), HandlerError> {
    let event = Event::from_callback(&q);
    tokio::spawn(async move { handlers::dispatch(&state, event).await });
    Ok(())
}
