use serde::{Deserialize, Serialize};

use crate::text::segment::DelimiterMode;
use crate::tts::types::ProviderKind;

pub const DEFAULT_OPENAI_VOICE: &str = "alloy";
// Rachel
pub const DEFAULT_ELEVENLABS_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_VERTEX_VOICE: &str = "en-US-Neural2-A";

/// One credential per provider. A struct rather than a map so every provider
/// always has an entry; stored records missing a field keep the default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(default)]
    pub openai: String,
    #[serde(default)]
    pub elevenlabs: String,
    #[serde(default)]
    pub vertex: String,
}

impl ApiKeys {
    pub fn get(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::ElevenLabs => &self.elevenlabs,
            ProviderKind::Vertex => &self.vertex,
        }
    }

    pub fn set(&mut self, kind: ProviderKind, key: String) {
        match kind {
            ProviderKind::OpenAi => self.openai = key,
            ProviderKind::ElevenLabs => self.elevenlabs = key,
            ProviderKind::Vertex => self.vertex = key,
        }
    }
}

/// Selected voice id per provider, defaulting to each backend's fallback
/// voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSelection {
    #[serde(default = "default_openai_voice")]
    pub openai: String,
    #[serde(default = "default_elevenlabs_voice")]
    pub elevenlabs: String,
    #[serde(default = "default_vertex_voice")]
    pub vertex: String,
}

fn default_openai_voice() -> String {
    DEFAULT_OPENAI_VOICE.to_string()
}

fn default_elevenlabs_voice() -> String {
    DEFAULT_ELEVENLABS_VOICE.to_string()
}

fn default_vertex_voice() -> String {
    DEFAULT_VERTEX_VOICE.to_string()
}

impl Default for VoiceSelection {
    fn default() -> Self {
        Self {
            openai: default_openai_voice(),
            elevenlabs: default_elevenlabs_voice(),
            vertex: default_vertex_voice(),
        }
    }
}

impl VoiceSelection {
    pub fn get(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::ElevenLabs => &self.elevenlabs,
            ProviderKind::Vertex => &self.vertex,
        }
    }

    pub fn set(&mut self, kind: ProviderKind, voice_id: String) {
        match kind {
            ProviderKind::OpenAi => self.openai = voice_id,
            ProviderKind::ElevenLabs => self.elevenlabs = voice_id,
            ProviderKind::Vertex => self.vertex = voice_id,
        }
    }
}

/// The full persisted settings record. Loaded once at startup over the
/// defaults; every update operation re-persists the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_keys: ApiKeys,

    #[serde(default = "default_active_provider")]
    pub active_provider: ProviderKind,

    #[serde(default)]
    pub voice_settings: VoiceSelection,

    #[serde(default)]
    pub split_delimiter: DelimiterMode,
}

fn default_active_provider() -> ProviderKind {
    ProviderKind::OpenAi
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_keys: ApiKeys::default(),
            active_provider: default_active_provider(),
            voice_settings: VoiceSelection::default(),
            split_delimiter: DelimiterMode::default(),
        }
    }
}

impl Settings {
    /// Credential for the currently active provider.
    pub fn active_api_key(&self) -> &str {
        self.api_keys.get(self.active_provider)
    }

    /// Selected voice for the currently active provider.
    pub fn active_voice(&self) -> &str {
        self.voice_settings.get(self.active_provider)
    }
}
