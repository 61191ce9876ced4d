//! OpenAI text-to-speech implementation

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::tts::error::TtsError;
use crate::tts::provider::TtsProvider;
use crate::tts::types::Voice;

const SPEECH_URL: &str = "https://api.openai.com/v1/audio/speech";
const MODEL_ID: &str = "tts-1";
const DEFAULT_VOICE: &str = "alloy";

/// The vendor exposes a fixed set of voices; there is no listing endpoint.
const VOICES: [(&str, &str); 6] = [
    ("alloy", "Alloy"),
    ("echo", "Echo"),
    ("fable", "Fable"),
    ("onyx", "Onyx"),
    ("nova", "Nova"),
    ("shimmer", "Shimmer"),
];

pub struct OpenAiProvider {
    client: Client,
}

impl OpenAiProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    fn require_key(credential: &str) -> Result<&str, TtsError> {
        let key = credential.trim();
        if key.is_empty() {
            return Err(TtsError::Auth("no OpenAI API key configured".to_string()));
        }
        Ok(key)
    }
}

impl Default for OpenAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

#[async_trait::async_trait]
impl TtsProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    fn default_voice(&self) -> Voice {
        Voice::new(DEFAULT_VOICE, "Alloy")
    }

    async fn synthesize(
        &self,
        text: &str,
        credential: &str,
        voice_id: Option<&str>,
    ) -> Result<Vec<u8>, TtsError> {
        let key = Self::require_key(credential)?;
        let voice = voice_id.unwrap_or(DEFAULT_VOICE);

        debug!(voice, chars = text.chars().count(), "OpenAI synthesis request");

        let response = self
            .client
            .post(SPEECH_URL)
            .bearer_auth(key)
            .json(&SpeechRequest {
                model: MODEL_ID,
                voice,
                input: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Synthesis(format!(
                "OpenAI API error {status}: {body}"
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn list_voices(&self, _credential: &str) -> Result<Vec<Voice>, TtsError> {
        Ok(VOICES
            .iter()
            .map(|(id, name)| Voice::new(*id, *name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn voice_list_is_fixed() {
        let provider = OpenAiProvider::new();
        let voices = provider.list_voices("irrelevant").await.unwrap();
        assert_eq!(voices.len(), 6);
        assert_eq!(voices[0].id, "alloy");
    }

    #[tokio::test]
    async fn blank_credential_fails_before_network() {
        let provider = OpenAiProvider::new();
        let err = provider.synthesize("hi", "  ", None).await.unwrap_err();
        assert!(matches!(err, TtsError::Auth(_)));
    }

    #[test]
    fn default_voice_is_in_the_fixed_list() {
        let provider = OpenAiProvider::new();
        let default = provider.default_voice();
        assert!(VOICES.iter().any(|(id, _)| *id == default.id));
    }
}
