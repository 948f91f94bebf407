//! Reelsmith CLI — the main entry point.
//!
//! Commands:
//! - `init`        — Write the default config file
//! - `chat`        — Interactive or single-message assistant chat
//! - `script`      — One-shot script generation
//! - `translate`   — Translate a script's narrations
//! - `title`       — Suggest a YouTube title
//! - `description` — Write a YouTube description
//! - `languages`   — List translation languages

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "reelsmith",
    about = "Reelsmith — conversational movie scripts for video reels",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init,

    /// Chat with the script assistant
    Chat {
        /// Script file (JSON) to ground the chat on and save changes to
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Anchor image for style reference (up to 3)
        #[arg(short, long = "anchor")]
        anchors: Vec<PathBuf>,

        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Generate a script from a prompt in one request
    Script {
        /// What the video is about
        #[arg(short, long)]
        prompt: String,

        /// Write the script here instead of printing it
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Translate a script's narrations
    Translate {
        /// Script file (JSON)
        #[arg(short, long)]
        script: PathBuf,

        /// Target language code or name (defaults to the configured one)
        #[arg(short, long)]
        lang: Option<String>,

        /// Write the translation back into the script file
        #[arg(long)]
        apply: bool,
    },

    /// Suggest a YouTube title for a script
    Title {
        #[arg(short, long)]
        script: PathBuf,

        #[arg(short, long = "anchor")]
        anchors: Vec<PathBuf>,
    },

    /// Write a YouTube description for a script
    Description {
        #[arg(short, long)]
        script: PathBuf,

        #[arg(short, long = "anchor")]
        anchors: Vec<PathBuf>,
    },

    /// List the translation languages
    Languages,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => commands::init::run()?,
        Commands::Chat {
            script,
            anchors,
            message,
        } => commands::chat::run(script, anchors, message).await?,
        Commands::Script { prompt, out } => commands::script::run(prompt, out).await?,
        Commands::Translate {
            script,
            lang,
            apply,
        } => commands::translate::run(script, lang, apply).await?,
        Commands::Title { script, anchors } => {
            commands::metadata::run(commands::metadata::Field::Title, script, anchors).await?
        }
        Commands::Description { script, anchors } => {
            commands::metadata::run(commands::metadata::Field::Description, script, anchors).await?
        }
        Commands::Languages => commands::languages::run(),
    }

    Ok(())
}
