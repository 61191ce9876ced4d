//! Canned provider used by pipeline tests; not part of the closed factory
//! domain.

use std::sync::Mutex;

use crate::tts::error::TtsError;
use crate::tts::provider::TtsProvider;
use crate::tts::types::Voice;

#[derive(Debug, Clone, Default)]
pub enum MockBehavior {
    /// Return the configured audio bytes.
    #[default]
    Success,
    /// Fail as if the credential were rejected.
    AuthError,
    /// Fail as if the backend rejected the request.
    SynthesisError(String),
}

pub struct MockProvider {
    pub audio: Vec<u8>,
    pub behavior: MockBehavior,
    pub requests: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn returning(audio: Vec<u8>) -> Self {
        Self {
            audio,
            behavior: MockBehavior::Success,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(behavior: MockBehavior) -> Self {
        Self {
            audio: Vec::new(),
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl TtsProvider for MockProvider {
    fn name(&self) -> &'static str {
        "Mock"
    }

    fn default_voice(&self) -> Voice {
        Voice::new("mock-voice", "Mock Voice")
    }

    async fn synthesize(
        &self,
        text: &str,
        _credential: &str,
        _voice_id: Option<&str>,
    ) -> Result<Vec<u8>, TtsError> {
        self.requests.lock().unwrap().push(text.to_string());
        match &self.behavior {
            MockBehavior::Success => Ok(self.audio.clone()),
            MockBehavior::AuthError => Err(TtsError::Auth("mock credential rejected".into())),
            MockBehavior::SynthesisError(message) => Err(TtsError::Synthesis(message.clone())),
        }
    }

    async fn list_voices(&self, _credential: &str) -> Result<Vec<Voice>, TtsError> {
        Ok(vec![self.default_voice()])
    }
}
