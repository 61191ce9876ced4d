use std::sync::Arc;

use tempfile::TempDir;

use crate::settings::config::{Settings, DEFAULT_ELEVENLABS_VOICE, DEFAULT_VERTEX_VOICE};
use crate::settings::manager::SettingsManager;
use crate::settings::store::{FileStore, MemoryStore, SettingsStore};
use crate::text::segment::DelimiterMode;
use crate::tts::types::ProviderKind;

#[test]
fn missing_store_yields_defaults() {
    let manager = SettingsManager::with_store(Arc::new(MemoryStore::new()));
    assert_eq!(manager.settings(), Settings::default());
}

#[test]
fn corrupt_store_falls_back_to_defaults() {
    let store = Arc::new(MemoryStore::with_contents("{not valid json"));
    let manager = SettingsManager::with_store(store);
    assert_eq!(manager.settings(), Settings::default());
}

#[test]
fn stored_record_missing_voice_settings_keeps_all_defaults() {
    let store = Arc::new(MemoryStore::with_contents(
        r#"{"active_provider":"vertex","api_keys":{"openai":"sk-test"}}"#,
    ));
    let manager = SettingsManager::with_store(store);
    let settings = manager.settings();

    // Stored keys preserved.
    assert_eq!(settings.active_provider, ProviderKind::Vertex);
    assert_eq!(settings.api_keys.openai, "sk-test");
    // Missing keys keep defaults, including the full voice table.
    assert_eq!(settings.voice_settings.openai, "alloy");
    assert_eq!(settings.voice_settings.elevenlabs, DEFAULT_ELEVENLABS_VOICE);
    assert_eq!(settings.voice_settings.vertex, DEFAULT_VERTEX_VOICE);
    assert_eq!(settings.split_delimiter, DelimiterMode::PeriodNewline);
}

#[test]
fn partial_voice_settings_merge_over_defaults() {
    let store = Arc::new(MemoryStore::with_contents(
        r#"{"voice_settings":{"openai":"nova"}}"#,
    ));
    let manager = SettingsManager::with_store(store);
    let settings = manager.settings();
    assert_eq!(settings.voice_settings.openai, "nova");
    assert_eq!(settings.voice_settings.elevenlabs, DEFAULT_ELEVENLABS_VOICE);
}

#[test]
fn updates_persist_immediately() {
    let store = Arc::new(MemoryStore::new());
    let manager = SettingsManager::with_store(store.clone());

    manager
        .set_api_key(ProviderKind::ElevenLabs, "xi-key".to_string())
        .unwrap();
    manager.set_active_provider(ProviderKind::ElevenLabs).unwrap();
    manager
        .set_voice(ProviderKind::OpenAi, "shimmer".to_string())
        .unwrap();
    manager.set_split_delimiter(DelimiterMode::Period).unwrap();

    let stored = store.load().unwrap().expect("record was saved");
    let reloaded: Settings = serde_json::from_str(&stored).unwrap();
    assert_eq!(reloaded, manager.settings());
    assert_eq!(reloaded.api_keys.elevenlabs, "xi-key");
    assert_eq!(reloaded.active_provider, ProviderKind::ElevenLabs);
    assert_eq!(reloaded.voice_settings.openai, "shimmer");
    assert_eq!(reloaded.split_delimiter, DelimiterMode::Period);
}

#[test]
fn file_store_round_trips_through_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");

    {
        let manager = SettingsManager::with_store(Arc::new(FileStore::new(path.clone())));
        manager
            .set_api_key(ProviderKind::OpenAi, "sk-disk".to_string())
            .unwrap();
    }
    assert!(path.exists());

    let manager = SettingsManager::with_store(Arc::new(FileStore::new(path)));
    assert_eq!(manager.settings().api_keys.openai, "sk-disk");
}

#[test]
fn active_accessors_follow_the_active_provider() {
    let mut settings = Settings::default();
    settings.active_provider = ProviderKind::Vertex;
    settings
        .api_keys
        .set(ProviderKind::Vertex, "{\"project_id\":\"p\"}".to_string());
    assert_eq!(settings.active_api_key(), "{\"project_id\":\"p\"}");
    assert_eq!(settings.active_voice(), DEFAULT_VERTEX_VOICE);
}
