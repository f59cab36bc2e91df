use teloxide::types::{ChatId, MessageId};

use crate::bot::event::{Callback, Event};
use crate::bot::keyboard::{self, VOICE_PAGE_SIZE};
use crate::bot::token::CallbackAction;
use crate::bot::{messages, session, AppState};
use crate::db::models::User;

pub async fn handle_callback(
    state: &AppState,
    event: &Event,
    user: &User,
    callback: &Callback,
) -> anyhow::Result<()> {
    let data = match callback.data.as_deref() {
        Some(d) => d,
        None => return Ok(()),
    };
    let chat_id = event.chat_id;

    let action = match CallbackAction::decode(data) {
        Ok(action) => action,
        Err(e) if e.is_user_visible() => {
            tracing::warn!("Chat {}: {}", chat_id, e);
            state.reply(chat_id, messages::SOMETHING_WENT_WRONG).await?;
            return Ok(());
        }
        Err(e) => {
            tracing::debug!("Chat {}: ignoring callback: {}", chat_id, e);
            return Ok(());
        }
    };

    match action {
        // ── Catalog navigation ─────────────────────────────────────────
        CallbackAction::Page(page) => {
            show_catalog(state, chat_id, user, page, callback.message_id).await?;
        }

        // ── Voice details ──────────────────────────────────────────────
        CallbackAction::Info { voice_id, page } => match state.catalog.voice(voice_id).await {
            Some(voice) => {
                let (text, markup) = keyboard::voice_details(&voice, page);
                state
                    .show(chat_id, callback.message_id, &text, markup)
                    .await?;
            }
            None => {
                tracing::warn!("Chat {} asked for unknown voice {}", chat_id, voice_id);
                state.reply(chat_id, messages::SOMETHING_WENT_WRONG).await?;
            }
        },

        // ── Voice selection ────────────────────────────────────────────
        CallbackAction::Select(voice_id) => {
            match session::select_voice(state.store.as_ref(), user, voice_id).await {
                Ok(_) => {
                    tracing::info!("Chat {} selected voice {}", chat_id, voice_id);
                    state.reply(chat_id, messages::VOICE_IS_SET).await?;
                }
                Err(e) => {
                    tracing::error!("Failed to save voice for chat {}: {:#}", chat_id, e);
                    state.reply(chat_id, messages::SOMETHING_WENT_WRONG).await?;
                }
            }
        }
    }

    Ok(())
}

/// Show catalog page `page` for the user, editing `edit` in place when given.
pub async fn show_catalog(
    state: &AppState,
    chat_id: ChatId,
    user: &User,
    page: u32,
    edit: Option<MessageId>,
) -> anyhow::Result<()> {
    let voices = match state.catalog.get_or_fetch(chat_id.0, &user.api_key).await {
        Ok(voices) => voices,
        Err(e) => {
            tracing::warn!("Chat {}: {}", chat_id, e);
            state.reply(chat_id, messages::SOMETHING_WENT_WRONG).await?;
            return Ok(());
        }
    };

    let rendered = keyboard::catalog_page(&voices, page, VOICE_PAGE_SIZE);
    tracing::debug!(
        "Chat {}: voice page {}/{}",
        chat_id,
        rendered.page,
        rendered.total_pages
    );
    state
        .show(chat_id, edit, &rendered.text, rendered.keyboard)
        .await
}
