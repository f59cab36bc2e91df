use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sentinel voice id meaning "no voice selected". Provider ids are never negative.
pub const NO_VOICE: i64 = -1;

/// Conversation mode of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserState {
    #[default]
    Normal,
    /// The next inbound text is consumed as a Steos Voice API key.
    AwaitingApiKey,
}

impl UserState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::AwaitingApiKey => "AWAITING_API_KEY",
        }
    }

    /// Decode the stored text. Unknown values fall back to `Normal`.
    pub fn from_str_loose(s: &str) -> Self {
        match s {
            "AWAITING_API_KEY" => Self::AwaitingApiKey,
            "NORMAL" => Self::Normal,
            other => {
                tracing::warn!("Unknown stored user state '{}', treating as NORMAL", other);
                Self::Normal
            }
        }
    }
}

impl fmt::Display for UserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub chat_id: i64,
    pub state: UserState,
    /// Empty when no key is configured.
    pub api_key: String,
    /// `NO_VOICE` until a voice is chosen.
    pub voice_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A freshly contacted user, before anything is configured.
    pub fn new(chat_id: i64, state: UserState) -> Self {
        let now = Utc::now();
        Self {
            chat_id,
            state,
            api_key: String::new(),
            voice_id: NO_VOICE,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn has_voice(&self) -> bool {
        self.voice_id != NO_VOICE
    }
}

/// Raw `tg_users` row; `state` is kept as text in the table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub chat_id: i64,
    pub state: String,
    pub api_key: String,
    pub voice_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            chat_id: row.chat_id,
            state: UserState::from_str_loose(&row.state),
            api_key: row.api_key,
            voice_id: row.voice_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
