//! Process-lifetime cache of provider voice catalogs.
//!
//! Two maps live here: the sorted catalog last fetched for each chat, and a
//! global id → voice index fed by every fetch. The detail view resolves voices
//! through the global index, so it never refetches a whole catalog. Neither
//! map expires or is pruned; a fetch overwrites the chat's entry and merges
//! into the index with last-write-wins on equal ids.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use super::{Voice, VoiceProvider};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("voice list request failed: {0}")]
    Transport(#[from] anyhow::Error),

    #[error("provider refused voice list: {0}")]
    Rejected(String),
}

pub struct VoiceCatalog {
    provider: Arc<dyn VoiceProvider>,
    by_chat: RwLock<HashMap<i64, Arc<Vec<Voice>>>>,
    by_id: RwLock<HashMap<i64, Voice>>,
}

impl VoiceCatalog {
    pub fn new(provider: Arc<dyn VoiceProvider>) -> Self {
        Self {
            provider,
            by_chat: RwLock::new(HashMap::new()),
            by_id: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch the catalog for `api_key`, sort it by id and store it for
    /// `chat_id`. Nothing is touched when the fetch fails.
    pub async fn fetch_and_cache(
        &self,
        chat_id: i64,
        api_key: &str,
    ) -> Result<Arc<Vec<Voice>>, CatalogError> {
        let resp = self.provider.list_voices(api_key).await?;
        if !resp.status {
            return Err(CatalogError::Rejected(resp.message));
        }

        let mut voices = resp.voices;
        voices.sort_by_key(|v| v.id);
        let voices = Arc::new(voices);

        self.by_chat.write().await.insert(chat_id, voices.clone());
        {
            let mut index = self.by_id.write().await;
            for voice in voices.iter() {
                index.insert(voice.id, voice.clone());
            }
        }

        tracing::debug!("Cached {} voices for chat {}", voices.len(), chat_id);
        Ok(voices)
    }

    /// The cached catalog for `chat_id`, fetching it on a miss.
    pub async fn get_or_fetch(
        &self,
        chat_id: i64,
        api_key: &str,
    ) -> Result<Arc<Vec<Voice>>, CatalogError> {
        if let Some(voices) = self.cached(chat_id).await {
            return Ok(voices);
        }
        self.fetch_and_cache(chat_id, api_key).await
    }

    pub async fn cached(&self, chat_id: i64) -> Option<Arc<Vec<Voice>>> {
        self.by_chat.read().await.get(&chat_id).cloned()
    }

    /// Look a voice up in the global index.
    pub async fn voice(&self, voice_id: i64) -> Option<Voice> {
        self.by_id.read().await.get(&voice_id).cloned()
    }

    #[cfg(test)]
    pub async fn indexed_count(&self) -> usize {
        self.by_id.read().await.len()
    }
}
