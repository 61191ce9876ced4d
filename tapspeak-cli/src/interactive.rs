use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use tapspeak_core::{segment, SettingsManager, SpeechPipeline};

use crate::commands;

const WELCOME: &str = "Type text to load it, a segment number to speak it, /help for commands";

const HELP: &str = "\
  <text>                     load new text (replaces the current buffer)
  <n>                        speak segment n
  /show                      list segments with limit-check marks
  /speak                     speak the whole buffer
  /export [path]             write the buffer as a WAV file
  /provider <name>           switch provider (openai, elevenlabs, vertex)
  /voice <id>                select a voice for the active provider
  /voices                    list voices for the active provider
  /key <provider> <secret>   store a credential
  /delimiter <mode>          newline, period, or period_newline
  /quit                      exit";

pub struct InteractiveApp {
    manager: SettingsManager,
    pipeline: SpeechPipeline,
    text: String,
}

impl InteractiveApp {
    pub fn new(manager: SettingsManager) -> Self {
        Self {
            manager,
            pipeline: SpeechPipeline::new(),
            text: String::new(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        println!("{WELCOME}");

        loop {
            let line = match rl.readline("\x1b[35m>\x1b[0m ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(_) => break,
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            rl.add_history_entry(&line)?;

            if let Some(command) = input.strip_prefix('/') {
                if !self.handle_command(command).await? {
                    break;
                }
                continue;
            }

            if let Ok(index) = input.parse::<usize>() {
                self.speak_segment(index).await;
                continue;
            }

            // Anything else replaces the buffer, like switching to edit mode.
            self.text = line;
            self.show();
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Returns false when the loop should exit.
    async fn handle_command(&mut self, command: &str) -> Result<bool> {
        let (name, rest) = match command.split_once(' ') {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        match name {
            "help" => println!("{HELP}"),
            "quit" | "exit" => return Ok(false),
            "show" => self.show(),
            "speak" => {
                let settings = self.manager.settings();
                if let Err(err) = self.pipeline.speak(&self.text, &settings).await {
                    println!("error: {err:#}");
                }
            }
            "export" => {
                let settings = self.manager.settings();
                let output = (!rest.is_empty()).then(|| std::path::PathBuf::from(rest));
                match self
                    .pipeline
                    .export(&self.text, &settings, output.as_deref())
                    .await
                {
                    Ok(path) => println!("wrote {}", path.display()),
                    Err(err) => println!("error: {err:#}"),
                }
            }
            "provider" => match commands::parse_provider(rest) {
                Ok(kind) => self.manager.set_active_provider(kind)?,
                Err(err) => println!("error: {err:#}"),
            },
            "voice" => {
                let kind = self.manager.settings().active_provider;
                self.manager.set_voice(kind, rest.to_string())?;
            }
            "voices" => {
                if let Err(err) = commands::voices(&self.manager, None).await {
                    println!("error: {err:#}");
                }
            }
            "key" => match rest.split_once(' ') {
                Some((provider, secret)) => match commands::parse_provider(provider) {
                    Ok(kind) => self.manager.set_api_key(kind, secret.trim().to_string())?,
                    Err(err) => println!("error: {err:#}"),
                },
                None => println!("usage: /key <provider> <secret>"),
            },
            "delimiter" => match commands::parse_delimiter(rest) {
                Ok(mode) => self.manager.set_split_delimiter(mode)?,
                Err(err) => println!("error: {err:#}"),
            },
            other => println!("unknown command /{other}, try /help"),
        }
        Ok(true)
    }

    fn show(&self) {
        if self.text.is_empty() {
            println!("no text loaded");
            return;
        }
        commands::print_segments(&self.text, &self.manager.settings());
    }

    async fn speak_segment(&self, index: usize) {
        let settings = self.manager.settings();
        let segments = segment(&self.text, settings.split_delimiter);
        let Some(piece) = segments.get(index) else {
            println!("segment {index} is out of range ({} segments)", segments.len());
            return;
        };
        if piece.trim().is_empty() {
            return;
        }
        if let Err(err) = self.pipeline.speak_segment(piece, index, &settings).await {
            println!("error: {err:#}");
        }
    }
}
