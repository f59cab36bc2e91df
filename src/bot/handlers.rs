use crate::bot::commands::{self, BotCommand};
use crate::bot::event::Event;
use crate::bot::session::{self, KeySubmission};
use crate::bot::transport::ChatTransport;
use crate::bot::{callbacks, messages, AppState};
use crate::db::models::{User, UserState};
use crate::db::UserStore;
use crate::tts::{ProviderFailure, VoiceProvider};

/// Route one inbound event. A user waiting for an API key has the event
/// consumed as the key whatever it looks like; otherwise commands, button
/// presses and text (or captions) are told apart, in that order.
pub async fn dispatch(state: &AppState, event: Event) {
    let chat_id = event.chat_id;

    let user = match state.store.get_or_create(chat_id.0, UserState::Normal).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to load user for chat {}: {:#}", chat_id, e);
            if let Err(e) = state.reply(chat_id, messages::SOMETHING_WENT_WRONG).await {
                tracing::error!("Failed to reply to chat {}: {:#}", chat_id, e);
            }
            return;
        }
    };

    if let Some(callback) = &event.callback {
        if let Err(e) = state.transport.answer_callback(&callback.id).await {
            tracing::warn!("Failed to answer callback in chat {}: {:#}", chat_id, e);
        }
    }

    let result = if user.state == UserState::AwaitingApiKey {
        handle_api_key(state, &event, &user).await
    } else if event.is_command {
        match event.text.as_deref().and_then(BotCommand::from_text) {
            Some(cmd) => commands::handle_command(state, &event, &user, cmd).await,
            None => state.reply(chat_id, messages::UNKNOWN_COMMAND).await,
        }
    } else if let Some(callback) = &event.callback {
        callbacks::handle_callback(state, &event, &user, callback).await
    } else if let Some(text) = event.content() {
        synthesize(state, &event, &user, text).await
    } else {
        state.reply(chat_id, messages::CAN_NOT_HANDLE).await
    };

    if let Err(e) = result {
        tracing::error!("Handler failed for chat {}: {:#}", chat_id, e);
    }
}

async fn handle_api_key(state: &AppState, event: &Event, user: &User) -> anyhow::Result<()> {
    let chat_id = event.chat_id;
    let outcome = session::submit_api_key(
        state.store.as_ref(),
        state.provider.as_ref(),
        user,
        event.text.as_deref(),
    )
    .await;

    match outcome {
        Ok(KeySubmission::Accepted(updated)) => {
            tracing::info!("Chat {} configured an API key", chat_id);
            state.spawn_catalog_refresh(&updated);
            state.reply(chat_id, messages::API_KEY_IS_SET).await?;
        }
        Ok(KeySubmission::NotAKey) => state.reply(chat_id, messages::NOT_AN_API_KEY).await?,
        Ok(KeySubmission::Rejected) => {
            state
                .reply(chat_id, messages::FAILED_TO_VERIFY_API_KEY)
                .await?
        }
        Err(e) => {
            tracing::error!("Failed to save API key for chat {}: {:#}", chat_id, e);
            state.reply(chat_id, messages::SOMETHING_WENT_WRONG).await?;
        }
    }

    Ok(())
}

async fn synthesize(state: &AppState, event: &Event, user: &User, text: &str) -> anyhow::Result<()> {
    let chat_id = event.chat_id;

    if !user.has_api_key() {
        return state.reply(chat_id, messages::NO_API_KEY).await;
    }
    if !user.has_voice() {
        return state.reply(chat_id, messages::NO_VOICE).await;
    }

    let resp = match state
        .provider
        .synthesize(&user.api_key, text, user.voice_id)
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!("Synthesis request failed for chat {}: {:#}", chat_id, e);
            return state.reply(chat_id, messages::SOMETHING_WENT_WRONG).await;
        }
    };

    if !resp.status {
        let reply = match ProviderFailure::classify(&resp.message) {
            ProviderFailure::NotEnoughSymbols => messages::NOT_ENOUGH_SYMBOLS,
            ProviderFailure::Unavailable => messages::SERVICE_NOT_AVAILABLE,
            ProviderFailure::Other => {
                tracing::warn!("Synthesis refused for chat {}: {}", chat_id, resp.message);
                messages::SOMETHING_WENT_WRONG
            }
        };
        return state.reply(chat_id, reply).await;
    }

    tracing::debug!(
        "Chat {}: {} audio ready for voice {}",
        chat_id,
        resp.format,
        resp.voice_id
    );
    state
        .transport
        .send_audio_url(chat_id, &resp.audio_url, event.message_id)
        .await
}
