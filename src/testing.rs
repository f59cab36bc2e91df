//! In-memory stand-ins for the store, the provider and the chat transport.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId};

use crate::bot::event::{Callback, Event};
use crate::bot::transport::ChatTransport;
use crate::bot::{handlers, AppState};
use crate::config::BotSettings;
use crate::db::models::{User, UserState};
use crate::db::UserStore;
use crate::tts::catalog::VoiceCatalog;
use crate::tts::{SpeechResponse, SymbolsResponse, Voice, VoiceProvider, VoicesResponse};

pub fn voice(id: i64) -> Voice {
    Voice {
        id,
        names: HashMap::from([("EN".to_string(), format!("Voice {id}"))]),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<i64, User>>,
    pub fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn get(&self, chat_id: i64) -> Option<User> {
        self.users.lock().unwrap().get(&chat_id).cloned()
    }

    pub fn put(&self, user: User) {
        self.users.lock().unwrap().insert(user.chat_id, user);
    }

    pub fn seed(&self, chat_id: i64) -> User {
        let user = User::new(chat_id, UserState::Normal);
        self.put(user.clone());
        user
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_or_create(&self, chat_id: i64, default_state: UserState) -> anyhow::Result<User> {
        let mut users = self.users.lock().unwrap();
        Ok(users
            .entry(chat_id)
            .or_insert_with(|| User::new(chat_id, default_state))
            .clone())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            anyhow::bail!("store is read-only");
        }
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user.chat_id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => anyhow::bail!("user {} does not exist", user.chat_id),
        }
    }
}

/// Accepts exactly one API key and serves a fixed catalog for it.
pub struct FakeProvider {
    valid_key: String,
    voices: Mutex<Vec<Voice>>,
    speech_failure: Mutex<Option<String>>,
    pub unreachable: AtomicBool,
    pub list_calls: AtomicUsize,
    pub synth_calls: AtomicUsize,
    pub last_key: Mutex<String>,
    pub last_text: Mutex<String>,
}

impl FakeProvider {
    pub fn new(valid_key: &str, voices: Vec<Voice>) -> Self {
        Self {
            valid_key: valid_key.to_string(),
            voices: Mutex::new(voices),
            speech_failure: Mutex::new(None),
            unreachable: AtomicBool::new(false),
            list_calls: AtomicUsize::new(0),
            synth_calls: AtomicUsize::new(0),
            last_key: Mutex::new(String::new()),
            last_text: Mutex::new(String::new()),
        }
    }

    pub fn set_voices(&self, voices: Vec<Voice>) {
        *self.voices.lock().unwrap() = voices;
    }

    pub fn fail_speech(&self, message: &str) {
        *self.speech_failure.lock().unwrap() = Some(message.to_string());
    }

    fn check(&self, api_key: &str) -> anyhow::Result<bool> {
        *self.last_key.lock().unwrap() = api_key.to_string();
        if self.unreachable.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(api_key == self.valid_key)
    }
}

#[async_trait]
impl VoiceProvider for FakeProvider {
    async fn list_voices(&self, api_key: &str) -> anyhow::Result<VoicesResponse> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if !self.check(api_key)? {
            return Ok(VoicesResponse {
                status: false,
                message: "Invalid API key".to_string(),
                voices: Vec::new(),
            });
        }
        Ok(VoicesResponse {
            status: true,
            message: String::new(),
            voices: self.voices.lock().unwrap().clone(),
        })
    }

    async fn symbols(&self, api_key: &str) -> anyhow::Result<SymbolsResponse> {
        let valid = self.check(api_key)?;
        Ok(SymbolsResponse {
            status: valid,
            message: String::new(),
            symbols: if valid { 500 } else { 0 },
        })
    }

    async fn synthesize(
        &self,
        api_key: &str,
        text: &str,
        voice_id: i64,
    ) -> anyhow::Result<SpeechResponse> {
        self.synth_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.lock().unwrap() = text.to_string();
        let valid = self.check(api_key)?;
        if let Some(message) = self.speech_failure.lock().unwrap().clone() {
            return Ok(SpeechResponse {
                status: false,
                message,
                ..Default::default()
            });
        }
        Ok(SpeechResponse {
            status: valid,
            voice_id,
            audio_url: format!("https://audio.example/{voice_id}.mp3"),
            format: "mp3".to_string(),
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    EditText {
        chat_id: i64,
        message_id: i32,
        text: String,
    },
    EditKeyboard {
        chat_id: i64,
        message_id: i32,
        keyboard: InlineKeyboardMarkup,
    },
    Audio {
        chat_id: i64,
        url: String,
        reply_to: Option<MessageId>,
    },
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    answered: Mutex<Vec<String>>,
    pub fail_sends: AtomicBool,
    pub fail_text_edits: AtomicBool,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Plain texts sent as new messages.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_keyboard(&self) -> Option<InlineKeyboardMarkup> {
        self.sent().into_iter().rev().find_map(|s| match s {
            Sent::Text { keyboard, .. } => keyboard,
            Sent::EditKeyboard { keyboard, .. } => Some(keyboard),
            _ => None,
        })
    }

    pub fn answered(&self) -> Vec<String> {
        self.answered.lock().unwrap().clone()
    }

    fn record(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> anyhow::Result<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            anyhow::bail!("chat {} blocked the bot", chat_id);
        }
        self.record(Sent::Text {
            chat_id: chat_id.0,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> anyhow::Result<()> {
        if self.fail_text_edits.load(Ordering::SeqCst) {
            anyhow::bail!("message is not modified");
        }
        self.record(Sent::EditText {
            chat_id: chat_id.0,
            message_id: message_id.0,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn edit_keyboard(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        keyboard: InlineKeyboardMarkup,
    ) -> anyhow::Result<()> {
        self.record(Sent::EditKeyboard {
            chat_id: chat_id.0,
            message_id: message_id.0,
            keyboard,
        });
        Ok(())
    }

    async fn send_audio_url(
        &self,
        chat_id: ChatId,
        url: &str,
        reply_to: Option<MessageId>,
    ) -> anyhow::Result<()> {
        self.record(Sent::Audio {
            chat_id: chat_id.0,
            url: url.to_string(),
            reply_to,
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> anyhow::Result<()> {
        self.answered.lock().unwrap().push(callback_id.to_string());
        Ok(())
    }
}

/// Let detached tasks such as catalog refreshes run to completion.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

/// An `AppState` wired to the fakes, with event builders.
pub struct Harness {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub provider: Arc<FakeProvider>,
    pub catalog: Arc<VoiceCatalog>,
    pub transport: Arc<RecordingTransport>,
}

impl Harness {
    pub fn new(provider: FakeProvider) -> Self {
        let store = Arc::new(MemoryStore::default());
        let provider = Arc::new(provider);
        let catalog = Arc::new(VoiceCatalog::new(provider.clone()));
        let transport = Arc::new(RecordingTransport::default());

        let state = AppState {
            settings: BotSettings {
                start_message_interval: Duration::ZERO,
            },
            store: store.clone(),
            provider: provider.clone(),
            catalog: catalog.clone(),
            transport: transport.clone(),
        };

        Self {
            state,
            store,
            provider,
            catalog,
            transport,
        }
    }

    pub async fn send(&self, event: Event) {
        handlers::dispatch(&self.state, event).await;
    }

    pub fn text(&self, chat_id: i64, text: &str) -> Event {
        Event {
            chat_id: ChatId(chat_id),
            message_id: Some(MessageId(1)),
            text: Some(text.to_string()),
            caption: None,
            is_command: false,
            callback: None,
        }
    }

    pub fn command(&self, chat_id: i64, text: &str) -> Event {
        Event {
            is_command: true,
            ..self.text(chat_id, text)
        }
    }

    pub fn callback(&self, chat_id: i64, data: &str, message_id: Option<MessageId>) -> Event {
        Event {
            chat_id: ChatId(chat_id),
            message_id: None,
            text: None,
            caption: None,
            is_command: false,
            callback: Some(Callback {
                id: format!("cb-{data}"),
                data: Some(data.to_string()),
                message_id,
            }),
        }
    }
}
