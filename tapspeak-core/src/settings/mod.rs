pub mod config;
pub mod manager;
pub mod store;

#[cfg(test)]
mod tests;

pub use config::{ApiKeys, Settings, VoiceSelection};
pub use manager::SettingsManager;
pub use store::{FileStore, MemoryStore, SettingsStore};
