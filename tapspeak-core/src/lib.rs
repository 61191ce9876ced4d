pub mod audio;
pub mod pipeline;
pub mod settings;
pub mod text;
pub mod tts;

// Public library API - the types the CLI (or any other front end) needs to
// drive a session.
pub use audio::AudioBuffer;
pub use pipeline::{PipelineState, SpeechPipeline};
pub use settings::{Settings, SettingsManager};
pub use text::{segment, DelimiterMode};
pub use tts::{ProviderKind, TtsError, TtsProvider, Voice};
