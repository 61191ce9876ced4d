use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The closed set of supported TTS backends. Every per-provider mapping in
/// the crate (credentials, voice selection, character limits) covers all
/// three variants by construction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    ElevenLabs,
    Vertex,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::OpenAi,
        ProviderKind::ElevenLabs,
        ProviderKind::Vertex,
    ];
}

/// A synthesizable voice as surfaced to the user during voice selection.
/// Owned by whichever provider listing produced it; never persisted beyond
/// the selected id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl Voice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language_code: None,
            gender: None,
        }
    }
}
