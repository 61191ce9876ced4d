use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod interactive;

use crate::interactive::InteractiveApp;

#[derive(Parser, Debug)]
#[command(name = "tapspeak")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "tapspeak - interactive text-to-speech at the terminal")]
struct Args {
    /// Load settings from a specific file instead of ~/.tapspeak/settings.json
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize text (argument or stdin) and play it
    Speak {
        text: Option<String>,
        /// Speak only the Nth segment of the text
        #[arg(long, value_name = "N")]
        segment: Option<usize>,
    },
    /// Synthesize text and write it as a 16-bit PCM WAV file
    Export {
        text: Option<String>,
        /// Output path; defaults to tapspeak-<timestamp>.wav
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the numbered segmentation with limit-check marks
    Segments { text: Option<String> },
    /// List voices for the active (or given) provider
    Voices {
        #[arg(long)]
        provider: Option<String>,
    },
    /// Inspect or update settings
    Config {
        #[command(subcommand)]
        action: commands::ConfigAction,
    },
}

fn main() -> Result<()> {
    setup_tracing()?;

    // cpal streams are not Send, so everything runs on one thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let local = tokio::task::LocalSet::new();
        local.run_until(async_main()).await
    })
}

async fn async_main() -> Result<()> {
    let args = Args::parse();
    let manager = commands::settings_manager(args.settings)?;

    match args.command {
        Some(Command::Speak { text, segment }) => commands::speak(&manager, text, segment).await,
        Some(Command::Export { text, output }) => {
            commands::export(&manager, text, output.as_deref()).await
        }
        Some(Command::Segments { text }) => commands::segments(&manager, text),
        Some(Command::Voices { provider }) => commands::voices(&manager, provider).await,
        Some(Command::Config { action }) => commands::config(&manager, action),
        None => InteractiveApp::new(manager).run().await,
    }
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    // Log to a file so playback output stays clean
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    let trace_dir = PathBuf::from(home).join(".tapspeak").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("tapspeak.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true),
        )
        .with(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
