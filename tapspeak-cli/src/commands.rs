use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use tapspeak_core::settings::{FileStore, SettingsManager};
use tapspeak_core::text::{is_within_limit, limits, segment};
use tapspeak_core::tts::factory;
use tapspeak_core::{DelimiterMode, ProviderKind, SpeechPipeline};

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the current settings (credentials redacted)
    Show,
    /// Store an API key or service-account document for a provider
    SetKey { provider: String, key: String },
    /// Switch the active provider
    SetProvider { provider: String },
    /// Select a voice for a provider
    SetVoice { provider: String, voice: String },
    /// Change the segmentation delimiter mode
    SetDelimiter { mode: String },
}

pub fn settings_manager(path: Option<PathBuf>) -> Result<SettingsManager> {
    match path {
        Some(path) => Ok(SettingsManager::with_store(Arc::new(FileStore::new(path)))),
        None => SettingsManager::new(),
    }
}

pub fn parse_provider(name: &str) -> Result<ProviderKind> {
    name.parse()
        .map_err(|_| anyhow::anyhow!("unknown provider '{name}' (openai, elevenlabs, vertex)"))
}

pub fn parse_delimiter(name: &str) -> Result<DelimiterMode> {
    name.parse().map_err(|_| {
        anyhow::anyhow!("unknown delimiter mode '{name}' (newline, period, period_newline)")
    })
}

/// Text from the argument, or stdin when omitted.
fn read_text(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}

pub async fn speak(
    manager: &SettingsManager,
    text: Option<String>,
    segment_index: Option<usize>,
) -> Result<()> {
    let text = read_text(text)?;
    let settings = manager.settings();
    let pipeline = SpeechPipeline::new();

    match segment_index {
        Some(index) => {
            let segments = segment(&text, settings.split_delimiter);
            let Some(piece) = segments.get(index) else {
                bail!(
                    "segment {index} is out of range (text has {} segments)",
                    segments.len()
                );
            };
            // Delimiter runs are addressable but carry nothing speakable;
            // skip them quietly, as the interactive loop does.
            if piece.trim().is_empty() {
                return Ok(());
            }
            pipeline.speak_segment(piece, index, &settings).await
        }
        None => pipeline.speak(&text, &settings).await,
    }
}

pub async fn export(
    manager: &SettingsManager,
    text: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    let text = read_text(text)?;
    let settings = manager.settings();
    let pipeline = SpeechPipeline::new();

    let path = pipeline.export(&text, &settings, output).await?;
    println!("wrote {}", path.display());
    Ok(())
}

pub fn segments(manager: &SettingsManager, text: Option<String>) -> Result<()> {
    let text = read_text(text)?;
    let settings = manager.settings();
    print_segments(&text, &settings);
    Ok(())
}

pub fn print_segments(text: &str, settings: &tapspeak_core::Settings) {
    let kind = settings.active_provider;
    for (index, piece) in segment(text, settings.split_delimiter).iter().enumerate() {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            println!("{index:>3}  (delimiter)");
            continue;
        }
        let mark = if is_within_limit(trimmed, kind) { ' ' } else { '!' };
        println!("{index:>3} {mark} {}", trimmed.replace('\n', " "));
    }
    if let Err(err) = limits::check_speakable(text, kind, settings.split_delimiter) {
        println!("warning: {err}");
    }
}

pub async fn voices(manager: &SettingsManager, provider: Option<String>) -> Result<()> {
    let settings = manager.settings();
    let kind = match provider {
        Some(name) => parse_provider(&name)?,
        None => settings.active_provider,
    };

    let provider = factory::provider(kind);
    let voices = provider.list_voices(settings.api_keys.get(kind)).await?;
    for voice in voices {
        match &voice.language_code {
            Some(language) => println!("{}  {} [{language}]", voice.id, voice.name),
            None => println!("{}  {}", voice.id, voice.name),
        }
    }
    Ok(())
}

pub fn config(manager: &SettingsManager, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = manager.settings();
            println!("active provider: {}", settings.active_provider);
            println!("delimiter mode:  {}", settings.split_delimiter);
            for kind in ProviderKind::ALL {
                let key = settings.api_keys.get(kind);
                let state = if key.trim().is_empty() { "unset" } else { "set" };
                println!(
                    "{kind}: key {state}, voice {}",
                    settings.voice_settings.get(kind)
                );
            }
            Ok(())
        }
        ConfigAction::SetKey { provider, key } => {
            manager.set_api_key(parse_provider(&provider)?, key)
        }
        ConfigAction::SetProvider { provider } => {
            manager.set_active_provider(parse_provider(&provider)?)
        }
        ConfigAction::SetVoice { provider, voice } => {
            manager.set_voice(parse_provider(&provider)?, voice)
        }
        ConfigAction::SetDelimiter { mode } => {
            manager.set_split_delimiter(parse_delimiter(&mode)?)
        }
    }
}
