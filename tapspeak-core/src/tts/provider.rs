use std::pin::Pin;

use bytes::Bytes;
use tokio_stream::Stream;

use crate::tts::error::TtsError;
use crate::tts::types::Voice;

pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Bytes, TtsError>> + Send>>;

/// Uniform contract every TTS backend implements.
///
/// The credential is an opaque string at this boundary; each implementation
/// parses and validates its own shape and fails with [`TtsError::Auth`] on
/// malformed input without touching the network.
#[async_trait::async_trait]
pub trait TtsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// The voice used when no `voice_id` is supplied.
    fn default_voice(&self) -> Voice;

    /// Synthesize `text`, returning the fully buffered encoded audio.
    async fn synthesize(
        &self,
        text: &str,
        credential: &str,
        voice_id: Option<&str>,
    ) -> Result<Vec<u8>, TtsError>;

    /// Optional streaming capability; backends without one serve the buffered
    /// result as a single chunk.
    async fn synthesize_stream(
        &self,
        text: &str,
        credential: &str,
        voice_id: Option<&str>,
    ) -> Result<AudioStream, TtsError> {
        let audio = self.synthesize(text, credential, voice_id).await?;
        Ok(Box::pin(tokio_stream::once(Ok(Bytes::from(audio)))))
    }

    /// List available voices, ordered as the backend returns them.
    async fn list_voices(&self, credential: &str) -> Result<Vec<Voice>, TtsError>;
}
