pub mod elevenlabs;
pub mod error;
pub mod factory;
pub mod openai;
pub mod provider;
pub mod types;
pub mod vertex;

#[cfg(test)]
pub mod mock;

pub use error::TtsError;
pub use provider::TtsProvider;
pub use types::{ProviderKind, Voice};
