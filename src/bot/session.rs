//! Per-user conversation state transitions.
//!
//! Every transition is written through to the store before it is reported;
//! on a failed save the caller must not acknowledge the change.

use crate::db::models::{User, UserState};
use crate::db::UserStore;
use crate::tts::VoiceProvider;

#[derive(Debug, Clone, PartialEq)]
pub enum KeySubmission {
    /// Key verified and saved; the user is back to `Normal`.
    Accepted(User),
    /// Nothing usable was sent. The user keeps waiting.
    NotAKey,
    /// The provider did not accept the key. The user keeps waiting.
    Rejected,
}

/// `Normal` → `AwaitingApiKey`.
pub async fn begin_api_key_entry(store: &dyn UserStore, user: &User) -> anyhow::Result<User> {
    let mut updated = user.clone();
    updated.state = UserState::AwaitingApiKey;
    store.save(&updated).await?;
    Ok(updated)
}

/// `AwaitingApiKey` → `Normal` once `candidate` lists voices successfully.
/// The first voice in provider order becomes the selected voice.
pub async fn submit_api_key(
    store: &dyn UserStore,
    provider: &dyn VoiceProvider,
    user: &User,
    candidate: Option<&str>,
) -> anyhow::Result<KeySubmission> {
    let key = match candidate.filter(|k| !k.is_empty()) {
        Some(key) => key,
        None => return Ok(KeySubmission::NotAKey),
    };

    let resp = match provider.list_voices(key).await {
        Ok(resp) if resp.status => resp,
        Ok(resp) => {
            tracing::info!("API key of chat {} rejected: {}", user.chat_id, resp.message);
            return Ok(KeySubmission::Rejected);
        }
        Err(e) => {
            tracing::warn!("Could not verify API key of chat {}: {}", user.chat_id, e);
            return Ok(KeySubmission::Rejected);
        }
    };

    let mut updated = user.clone();
    updated.api_key = key.to_string();
    if let Some(first) = resp.voices.first() {
        updated.voice_id = first.id;
    }
    updated.state = UserState::Normal;
    store.save(&updated).await?;

    Ok(KeySubmission::Accepted(updated))
}

pub async fn select_voice(
    store: &dyn UserStore,
    user: &User,
    voice_id: i64,
) -> anyhow::Result<User> {
    let mut updated = user.clone();
    updated.voice_id = voice_id;
    store.save(&updated).await?;
    Ok(updated)
}
