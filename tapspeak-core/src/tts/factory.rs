use std::sync::OnceLock;

use crate::tts::elevenlabs::ElevenLabsProvider;
use crate::tts::openai::OpenAiProvider;
use crate::tts::provider::TtsProvider;
use crate::tts::types::ProviderKind;
use crate::tts::vertex::VertexProvider;

/// Maps a provider identifier to its shared, stateless implementation.
/// Total over the closed three-variant domain; each variant is initialized
/// lazily and reused for the rest of the session.
pub fn provider(kind: ProviderKind) -> &'static dyn TtsProvider {
    static OPENAI: OnceLock<OpenAiProvider> = OnceLock::new();
    static ELEVENLABS: OnceLock<ElevenLabsProvider> = OnceLock::new();
    static VERTEX: OnceLock<VertexProvider> = OnceLock::new();

    match kind {
        ProviderKind::OpenAi => OPENAI.get_or_init(OpenAiProvider::new),
        ProviderKind::ElevenLabs => ELEVENLABS.get_or_init(ElevenLabsProvider::new),
        ProviderKind::Vertex => VERTEX.get_or_init(VertexProvider::new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_pointer(provider: &'static dyn TtsProvider) -> *const () {
        provider as *const dyn TtsProvider as *const ()
    }

    #[test]
    fn repeated_lookups_return_the_same_instance() {
        for kind in ProviderKind::ALL {
            assert_eq!(data_pointer(provider(kind)), data_pointer(provider(kind)));
        }
    }

    #[test]
    fn distinct_kinds_get_distinct_instances() {
        let openai = data_pointer(provider(ProviderKind::OpenAi));
        let elevenlabs = data_pointer(provider(ProviderKind::ElevenLabs));
        let vertex = data_pointer(provider(ProviderKind::Vertex));
        assert_ne!(openai, elevenlabs);
        assert_ne!(elevenlabs, vertex);
        assert_ne!(openai, vertex);
    }

    #[test]
    fn names_match_variants() {
        assert_eq!(provider(ProviderKind::OpenAi).name(), "OpenAI");
        assert_eq!(provider(ProviderKind::ElevenLabs).name(), "ElevenLabs");
        assert_eq!(provider(ProviderKind::Vertex).name(), "Vertex AI");
    }
}
