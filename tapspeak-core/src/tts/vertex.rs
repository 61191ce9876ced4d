//! Google Cloud TTS via a trusted intermediary.
//!
//! This backend's auth model requires a private-key-bearing service-account
//! document that must never be sent to the vendor from an untrusted context,
//! so synthesis and voice listing are forwarded to a proxy endpoint that
//! holds the credential, performs the vendor call, and relays the result.

use std::env;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::tts::error::TtsError;
use crate::tts::provider::TtsProvider;
use crate::tts::types::Voice;

const DEFAULT_PROXY_URL: &str = "http://localhost:3000/api";
const PROXY_URL_ENV: &str = "TAPSPEAK_VERTEX_PROXY";
const DEFAULT_VOICE: &str = "en-US-Neural2-A";

pub struct VertexProvider {
    client: Client,
    base_url: String,
}

impl VertexProvider {
    pub fn new() -> Self {
        let base_url =
            env::var(PROXY_URL_ENV).unwrap_or_else(|_| DEFAULT_PROXY_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// The credential must be a service-account JSON document; its embedded
    /// project id selects the backend project scope on the proxy side.
    fn validate_credential(credential: &str) -> Result<(), TtsError> {
        if credential.trim().is_empty() {
            return Err(TtsError::Auth(
                "no Vertex AI service account configured".to_string(),
            ));
        }

        let document: Value = serde_json::from_str(credential).map_err(|e| {
            TtsError::Auth(format!("credential is not a service account document: {e}"))
        })?;

        if document.get("project_id").and_then(Value::as_str).is_none() {
            return Err(TtsError::Auth(
                "service account document is missing project_id".to_string(),
            ));
        }

        Ok(())
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => format!("Vertex AI error {status}: {}", parsed.error),
            Err(_) => format!("Vertex AI error {status}: {body}"),
        }
    }
}

impl Default for VertexProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    text: &'a str,
    voice_id: &'a str,
    credentials: &'a str,
}

#[derive(Serialize)]
struct VoicesRequest<'a> {
    credentials: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct VoicesResponse {
    voices: Vec<VertexVoice>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VertexVoice {
    name: String,
    ssml_gender: String,
    #[serde(default)]
    language_codes: Vec<String>,
}

/// Vendor voices arrive pre-qualified with language and gender; surface both
/// and compose the display name as "name (gender)".
fn normalize_voice(voice: VertexVoice) -> Voice {
    Voice {
        id: voice.name.clone(),
        name: format!("{} ({})", voice.name, voice.ssml_gender),
        language_code: voice.language_codes.first().cloned(),
        gender: Some(voice.ssml_gender),
    }
}

#[async_trait::async_trait]
impl TtsProvider for VertexProvider {
    fn name(&self) -> &'static str {
        "Vertex AI"
    }

    fn default_voice(&self) -> Voice {
        Voice {
            id: DEFAULT_VOICE.to_string(),
            name: DEFAULT_VOICE.to_string(),
            language_code: Some("en-US".to_string()),
            gender: None,
        }
    }

    async fn synthesize(
        &self,
        text: &str,
        credential: &str,
        voice_id: Option<&str>,
    ) -> Result<Vec<u8>, TtsError> {
        Self::validate_credential(credential)?;
        let voice = voice_id.unwrap_or(DEFAULT_VOICE);

        debug!(voice, chars = text.chars().count(), "Vertex synthesis request");

        let response = self
            .client
            .post(format!("{}/tts/vertex", self.base_url))
            .json(&SynthesizeRequest {
                text,
                voice_id: voice,
                credentials: credential,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TtsError::Synthesis(Self::error_message(response).await));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn list_voices(&self, credential: &str) -> Result<Vec<Voice>, TtsError> {
        Self::validate_credential(credential)?;

        let response = self
            .client
            .post(format!("{}/tts/vertex/voices", self.base_url))
            .json(&VoicesRequest {
                credentials: credential,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TtsError::Synthesis(Self::error_message(response).await));
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

    const VALID_CREDENTIAL: &str =
        r#"{"type":"service_account","project_id":"demo","private_key":"..."}"#;

    #[test]
    fn valid_service_account_passes() {
        assert!(VertexProvider::validate_credential(VALID_CREDENTIAL).is_ok());
    }

    #[test]
    fn malformed_credential_is_auth_error() {
        let err = VertexProvider::validate_credential("not json").unwrap_err();
        assert!(matches!(err, TtsError::Auth(_)));

        let err = VertexProvider::validate_credential(r#"{"type":"service_account"}"#)
            .unwrap_err();
        assert!(matches!(err, TtsError::Auth(_)));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_network() {
        let provider = VertexProvider::with_base_url("http://invalid.test".to_string());
        let err = provider.synthesize("hello", "", None).await.unwrap_err();
        assert!(matches!(err, TtsError::Auth(_)));
    }

    #[test]
    fn voices_are_normalized_with_language_and_gender() {
        let response: VoicesResponse = serde_json::from_str(
            r#"{"voices":[{"name":"en-US-Neural2-A","ssmlGender":"MALE","languageCodes":["en-US"]}]}"#,
        )
        .unwrap();
        let voice = normalize_voice(response.voices.into_iter().next().unwrap());
        assert_eq!(voice.id, "en-US-Neural2-A");
        assert_eq!(voice.name, "en-US-Neural2-A (MALE)");
        assert_eq!(voice.language_code.as_deref(), Some("en-US"));
        assert_eq!(voice.gender.as_deref(), Some("MALE"));
    }
}
