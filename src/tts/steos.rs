use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{SpeechResponse, SymbolsResponse, VoiceProvider, VoicesResponse};
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    voice_id: i64,
    text: &'a str,
    format: &'a str,
}

/// HTTP client for the Steos Voice API.
pub struct SteosVoiceClient {
    client: Client,
    base_url: String,
    format: String,
}

impl SteosVoiceClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.steos_api_url.clone(),
            format: config.speech_format.clone(),
        }
    }

    /// Read the JSON envelope. The API reports refusals in the body, so the
    /// HTTP status only matters when the body is not an envelope.
    async fn read<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
        let status = resp.status();
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            anyhow::anyhow!("Steos Voice API returned unreadable body ({}): {}", status, e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, api_key: &str) -> anyhow::Result<T> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("Accept", "application/json")
            .header("Authorization", api_key)
            .send()
            .await?;
        Self::read(resp).await
    }
}

#[async_trait]
impl VoiceProvider for SteosVoiceClient {
    async fn list_voices(&self, api_key: &str) -> anyhow::Result<VoicesResponse> {
        self.get("/get/voices", api_key).await
    }

    async fn symbols(&self, api_key: &str) -> anyhow::Result<SymbolsResponse> {
        self.get("/get/symbols", api_key).await
    }

    async fn synthesize(
        &self,
        api_key: &str,
        text: &str,
        voice_id: i64,
    ) -> anyhow::Result<SpeechResponse> {
        let resp = self
            .client
            .post(format!("{}/get/tts", self.base_url))
            .header("Accept", "application/json")
            .header("Authorization", api_key)
            .json(&SpeechRequest {
                voice_id,
                text,
                format: &self.format,
            })
            .send()
            .await?;
        Self::read(resp).await
    }
}
