pub mod catalog;
pub mod steos;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Provider message reported when the account's symbol quota is exhausted.
pub const NOT_ENOUGH_SYMBOLS: &str = "Not enough symbols";
/// Provider message reported when the synthesis backend is unreachable.
pub const CONNECTION_TIMEOUT: &str = "Connection timeout";

const UNKNOWN_SEX: &str = "unknown";

/// A voice from the provider catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Voice {
    #[serde(rename = "voice_id", default)]
    pub id: i64,
    /// Language tag ("RU", "EN", ...) to display name.
    #[serde(rename = "name", default)]
    pub names: HashMap<String, String>,
    #[serde(rename = "description", default)]
    pub descriptions: HashMap<String, String>,
    #[serde(rename = "id_lang", default)]
    pub language_id: i64,
    #[serde(default)]
    pub sex: String,
}

impl Voice {
    /// Russian name, then English, then the id.
    pub fn display_name(&self) -> String {
        localized(&self.names).unwrap_or_else(|| self.id.to_string())
    }

    /// Russian description, then English, then empty.
    pub fn display_description(&self) -> String {
        localized(&self.descriptions).unwrap_or_default()
    }

    pub fn display_sex(&self) -> &str {
        if self.sex.is_empty() {
            UNKNOWN_SEX
        } else {
            &self.sex
        }
    }
}

fn localized(texts: &HashMap<String, String>) -> Option<String> {
    texts.get("RU").or_else(|| texts.get("EN")).cloned()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoicesResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: String,
    /// In provider order.
    #[serde(default)]
    pub voices: Vec<Voice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymbolsResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub symbols: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeechResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub voice_id: i64,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub format: String,
}

/// The text-to-speech provider. `Err` means the call itself failed; a
/// provider-side refusal comes back as `status == false` with a message.
#[async_trait]
pub trait VoiceProvider: Send + Sync {
    async fn list_voices(&self, api_key: &str) -> anyhow::Result<VoicesResponse>;

    async fn symbols(&self, api_key: &str) -> anyhow::Result<SymbolsResponse>;

    async fn synthesize(
        &self,
        api_key: &str,
        text: &str,
        voice_id: i64,
    ) -> anyhow::Result<SpeechResponse>;
}

/// Category of a provider-reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFailure {
    NotEnoughSymbols,
    Unavailable,
    Other,
}

impl ProviderFailure {
    pub fn classify(message: &str) -> Self {
        match message {
            NOT_ENOUGH_SYMBOLS => Self::NotEnoughSymbols,
            CONNECTION_TIMEOUT => Self::Unavailable,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(id: i64, names: &[(&str, &str)]) -> Voice {
        Voice {
            id,
            names: names
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn name_prefers_russian() {
        let v = voice(1, &[("RU", "Алиса"), ("EN", "Alice")]);
        assert_eq!(v.display_name(), "Алиса");
    }

    #[test]
    fn name_falls_back_to_english_then_id() {
        assert_eq!(voice(2, &[("EN", "Bob")]).display_name(), "Bob");
        assert_eq!(voice(3, &[("DE", "Bernd")]).display_name(), "3");
    }

    #[test]
    fn description_and_sex_fallbacks() {
        let v = voice(4, &[]);
        assert_eq!(v.display_description(), "");
        assert_eq!(v.display_sex(), "unknown");

        let mut v = v;
        v.descriptions.insert("EN".to_string(), "Calm narrator".to_string());
        v.sex = "female".to_string();
        assert_eq!(v.display_description(), "Calm narrator");
        assert_eq!(v.display_sex(), "female");
    }

    #[test]
    fn failure_messages_are_classified_exactly() {
        assert_eq!(
            ProviderFailure::classify("Not enough symbols"),
            ProviderFailure::NotEnoughSymbols
        );
        assert_eq!(
            ProviderFailure::classify("Connection timeout"),
            ProviderFailure::Unavailable
        );
        assert_eq!(
            ProviderFailure::classify("not enough symbols"),
            ProviderFailure::Other
        );
        assert_eq!(ProviderFailure::classify(""), ProviderFailure::Other);
    }

    #[test]
    fn voices_response_parses_provider_json() {
        let json = r#"{
            "status": true,
            "voices": [
                {"voice_id": 7, "name": {"EN": "Seven"}, "id_lang": 2, "sex": "male"},
                {"voice_id": 3, "description": {"RU": "Тихий"}}
            ]
        }"#;
        let resp: VoicesResponse = serde_json::from_str(json).unwrap();
        assert!(resp.status);
        assert_eq!(resp.message, "");
        assert_eq!(resp.voices.len(), 2);
        assert_eq!(resp.voices[0].id, 7);
        assert_eq!(resp.voices[0].display_name(), "Seven");
        assert_eq!(resp.voices[1].display_description(), "Тихий");
        assert_eq!(resp.voices[1].display_sex(), "unknown");
    }
}
