//! ElevenLabs text-to-speech implementation

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tts::error::TtsError;
use crate::tts::provider::TtsProvider;
use crate::tts::types::Voice;

const BASE_URL: &str = "https://api.elevenlabs.io/v1";
const MODEL_ID: &str = "eleven_monolingual_v1";
const OUTPUT_FORMAT: &str = "mp3_44100_128";
// Rachel
const DEFAULT_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";

pub struct ElevenLabsProvider {
    client: Client,
    base_url: String,
}

impl ElevenLabsProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    fn require_key(credential: &str) -> Result<&str, TtsError> {
        let key = credential.trim();
        if key.is_empty() {
            return Err(TtsError::Auth(
                "no ElevenLabs API key configured".to_string(),
            ));
        }
        Ok(key)
    }
}

impl Default for ElevenLabsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[derive(Deserialize)]
struct VoicesResponse {
    voices: Vec<VoiceData>,
}

/// The vendor has been inconsistent about the id field's name across API
/// versions, so accept both spellings and fall back to the display name.
#[derive(Deserialize)]
struct VoiceData {
    #[serde(default, alias = "voiceId")]
    voice_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

fn normalize_voice(data: VoiceData) -> Voice {
    let name = data.name.unwrap_or_else(|| "Unknown Voice".to_string());
    let id = data.voice_id.unwrap_or_else(|| name.clone());
    Voice::new(id, name)
}

#[async_trait::async_trait]
impl TtsProvider for ElevenLabsProvider {
    fn name(&self) -> &'static str {
        "ElevenLabs"
    }

    fn default_voice(&self) -> Voice {
        Voice::new(DEFAULT_VOICE, "Rachel")
    }

    async fn synthesize(
        &self,
        text: &str,
        credential: &str,
        voice_id: Option<&str>,
    ) -> Result<Vec<u8>, TtsError> {
        let key = Self::require_key(credential)?;
        let voice = voice_id.unwrap_or(DEFAULT_VOICE);

        let url = format!(
            "{}/text-to-speech/{voice}?output_format={OUTPUT_FORMAT}",
            self.base_url
        );

        debug!(voice, chars = text.chars().count(), "ElevenLabs synthesis request");

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", key)
            .json(&SynthesizeRequest {
                text,
                model_id: MODEL_ID,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Synthesis(format!(
                "ElevenLabs API error {status}: {body}"
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn list_voices(&self, credential: &str) -> Result<Vec<Voice>, TtsError> {
        let key = Self::require_key(credential)?;

        let response = self
            .client
            .get(format!("{}/voices", self.base_url))
            .header("xi-api-key", key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Synthesis(format!(
                "ElevenLabs API error {status}: {body}"
            )));
        }

        let voices: VoicesResponse = response
            .json()
            .await
            .map_err(|e| TtsError::Synthesis(format!("unexpected voices response: {e}")))?;

        Ok(voices.voices.into_iter().map(normalize_voice).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_id_field_is_normalized() {
        let snake: VoicesResponse =
            serde_json::from_str(r#"{"voices":[{"voice_id":"abc","name":"Rachel"}]}"#).unwrap();
        let voice = normalize_voice(snake.voices.into_iter().next().unwrap());
        assert_eq!(voice.id, "abc");
        assert_eq!(voice.name, "Rachel");

        let camel: VoicesResponse =
            serde_json::from_str(r#"{"voices":[{"voiceId":"def","name":"Adam"}]}"#).unwrap();
        let voice = normalize_voice(camel.voices.into_iter().next().unwrap());
        assert_eq!(voice.id, "def");
    }

    #[test]
    fn missing_id_falls_back_to_name() {
        let response: VoicesResponse =
            serde_json::from_str(r#"{"voices":[{"name":"Bella"}]}"#).unwrap();
        let voice = normalize_voice(response.voices.into_iter().next().unwrap());
        assert_eq!(voice.id, "Bella");
        assert_eq!(voice.name, "Bella");
    }

    #[tokio::test]
    async fn blank_credential_fails_before_network() {
        let provider = ElevenLabsProvider::new();
        let err = provider.list_voices("").await.unwrap_err();
        assert!(matches!(err, TtsError::Auth(_)));
    }
}
