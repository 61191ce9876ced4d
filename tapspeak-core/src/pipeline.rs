//! Orchestrates a user-triggered playback or export: acquire the shared
//! playback device, validate the text, invoke the active provider, decode
//! the returned audio, and either schedule playback or hand the samples to
//! the WAV encoder.
//!
//! Overlapping triggers are not serialized and in-flight synthesis is never
//! cancelled; instead each request carries a generation number and only the
//! latest issued generation may touch the shared state, so a superseded
//! request's outcome is observed by its caller but not by the UI.

use std::cell::{Cell, OnceCell};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, warn};

use crate::audio::playback::{AudioPlayback, AudioPlayer};
use crate::audio::{decode, wav, AudioBuffer};
use crate::settings::config::Settings;
use crate::text::limits;
use crate::tts::factory;
use crate::tts::provider::TtsProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Acquiring,
    Synthesizing,
    Decoding,
    Playing,
    Error,
}

#[derive(Debug, Clone, Copy)]
struct ActiveRequest {
    generation: u64,
    segment: Option<usize>,
}

/// Single-session speech pipeline. Not thread-safe by design: provider calls
/// suspend the triggering task but never leave the one event loop, matching
/// the cooperative execution model of the surrounding app.
pub struct SpeechPipeline {
    player: OnceCell<AudioPlayer>,
    generation: Cell<u64>,
    active: Cell<Option<ActiveRequest>>,
    state: Cell<PipelineState>,
}

impl SpeechPipeline {
    pub fn new() -> Self {
        Self {
            player: OnceCell::new(),
            generation: Cell::new(0),
            active: Cell::new(None),
            state: Cell::new(PipelineState::Idle),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state.get()
    }

    /// Segment index of the latest in-flight or playing request, if any.
    /// This is the UI's "currently playing" indicator.
    pub fn playing_segment(&self) -> Option<usize> {
        self.active.get().and_then(|request| request.segment)
    }

    /// Synthesize `text` with the active provider and play it.
    pub async fn speak(&self, text: &str, settings: &Settings) -> Result<()> {
        self.speak_inner(text, None, settings).await
    }

    /// Like [`speak`](Self::speak), tagging the request with a segment index
    /// for the playing indicator.
    pub async fn speak_segment(
        &self,
        text: &str,
        segment: usize,
        settings: &Settings,
    ) -> Result<()> {
        self.speak_inner(text, Some(segment), settings).await
    }

    async fn speak_inner(
        &self,
        text: &str,
        segment: Option<usize>,
        settings: &Settings,
    ) -> Result<()> {
        let generation = self.begin(segment);

        let result = self.run_playback(generation, text, settings).await;
        match result {
            Ok(playback) => {
                self.transition(generation, PipelineState::Playing);
                playback.wait().await;
                self.settle(generation);
                Ok(())
            }
            Err(err) => {
                self.transition(generation, PipelineState::Error);
                warn!(error = %err, "speech request failed");
                self.settle(generation);
                Err(err)
            }
        }
    }

    /// Synthesize `text` and write it as a 16-bit PCM WAV. Returns the path
    /// written. No audible playback occurs.
    pub async fn export(
        &self,
        text: &str,
        settings: &Settings,
        output: Option<&Path>,
    ) -> Result<PathBuf> {
        let generation = self.begin(None);

        let result = self.fetch_decoded(generation, text, settings).await;
        let decoded = match result {
            Ok(decoded) => decoded,
            Err(err) => {
                self.transition(generation, PipelineState::Error);
                warn!(error = %err, "export failed");
                self.settle(generation);
                return Err(err);
            }
        };

        let bytes = wav::encode_wav(&decoded);
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(default_export_path);
        std::fs::write(&path, bytes)?;
        debug!(path = %path.display(), "wrote WAV export");
        self.settle(generation);
        Ok(path)
    }

    /// Issues a new request generation; the previous request, if any, is
    /// superseded for all shared-state purposes.
    fn begin(&self, segment: Option<usize>) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.active.set(Some(ActiveRequest {
            generation,
            segment,
        }));
        generation
    }

    async fn run_playback(
        &self,
        generation: u64,
        text: &str,
        settings: &Settings,
    ) -> Result<AudioPlayback> {
        limits::check_speakable(text, settings.active_provider, settings.split_delimiter)?;

        // Acquire happens synchronously before the first await so platforms
        // that gate audio on the triggering gesture stay unlocked; the
        // silent frame keeps the session warm during the network call.
        self.transition(generation, PipelineState::Acquiring);
        let player = self.acquire()?;
        player.unlock()?;

        self.transition(generation, PipelineState::Synthesizing);
        let provider = factory::provider(settings.active_provider);
        let decoded = Self::synthesize_and_decode(
            provider,
            text,
            settings.active_api_key(),
            Some(settings.active_voice()),
            |state| self.transition(generation, state),
        )
        .await?;

        player.play(&decoded)
    }

    async fn fetch_decoded(
        &self,
        generation: u64,
        text: &str,
        settings: &Settings,
    ) -> Result<AudioBuffer> {
        limits::check_speakable(text, settings.active_provider, settings.split_delimiter)?;

        self.transition(generation, PipelineState::Synthesizing);
        let provider = factory::provider(settings.active_provider);
        Self::synthesize_and_decode(
            provider,
            text,
            settings.active_api_key(),
            Some(settings.active_voice()),
            |state| self.transition(generation, state),
        )
        .await
    }

    async fn synthesize_and_decode(
        provider: &dyn TtsProvider,
        text: &str,
        credential: &str,
        voice_id: Option<&str>,
        on_decoding: impl FnOnce(PipelineState),
    ) -> Result<AudioBuffer> {
        let encoded = provider.synthesize(text, credential, voice_id).await?;
        on_decoding(PipelineState::Decoding);
        let decoded = decode::decode(&encoded)?;
        debug!(
            provider = provider.name(),
            channels = decoded.channel_count(),
            frames = decoded.frame_count(),
            sample_rate = decoded.sample_rate,
            "decoded synthesis result"
        );
        Ok(decoded)
    }

    /// Created at most once per session and reused; safe to call repeatedly.
    fn acquire(&self) -> Result<&AudioPlayer> {
        if let Some(player) = self.player.get() {
            return Ok(player);
        }
        let player = AudioPlayer::new()?;
        Ok(self.player.get_or_init(|| player))
    }

    /// State writes from superseded requests are dropped.
    fn transition(&self, generation: u64, state: PipelineState) {
        if self.generation.get() == generation {
            debug!(?state, generation, "pipeline state");
            self.state.set(state);
        }
    }

    /// Returns the pipeline to idle, but only if this request is still the
    /// latest; a newer request owns the indicator otherwise.
    fn settle(&self, generation: u64) {
        if let Some(active) = self.active.get() {
            if active.generation == generation {
                self.active.set(None);
                self.state.set(PipelineState::Idle);
            }
        }
    }
}

impl Default for SpeechPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn default_export_path() -> PathBuf {
    PathBuf::from(format!(
        "tapspeak-{}.wav",
        chrono::Utc::now().timestamp_millis()
    ))
}
