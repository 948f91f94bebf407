//! `reelsmith chat` — Interactive or single-message assistant chat.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use reelsmith_assistant::oneshot::{script_context, thumbnail_prompt};
use reelsmith_assistant::{
    AnchorImages, ChatSession, Effects, SessionFactory, ThumbnailRequest, TranslationPayload,
    dispatch,
};
use reelsmith_core::scene::MovieScript;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use super::{
    anchor_slots, load_config, load_script_or_empty, print_script, print_setup_prompt, save_script,
};

/// Terminal-side state the assistant's intents act on.
#[derive(Debug, Default)]
pub struct TerminalState {
    pub script: MovieScript,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Prompt for the external image service, once a thumbnail was requested
    pub thumbnail_prompt: Option<String>,
    /// Set when the script changed since the last save
    pub script_dirty: bool,
}

impl Effects for TerminalState {
    fn on_script_replace(&mut self, script: MovieScript) {
        info!(scenes = script.len(), "Script replaced");
        self.script = script;
        self.script_dirty = true;
    }

    fn on_translation_apply(&mut self, payload: TranslationPayload) {
        let updated = self.script.apply_translation(&payload.translated_narrations);
        info!(
            language = %payload.target_language,
            updated,
            "Translation applied"
        );
        self.script_dirty |= updated > 0;
    }

    fn on_title_set(&mut self, title: String) {
        self.title = Some(title);
    }

    fn on_description_set(&mut self, description: String) {
        self.description = Some(description);
    }

    fn on_thumbnail_requested(&mut self, request: ThumbnailRequest) {
        let context = script_context(&self.script.scenes);
        self.thumbnail_prompt = Some(thumbnail_prompt(&context, request.image_prompt.as_deref()));
    }

    fn on_incremental_text(&mut self, text: &str) {
        println!();
        for line in text.lines() {
            println!("  Assistant > {line}");
        }
        println!();
    }
}

impl TerminalState {
    fn print_summary(&self) {
        println!("  ── Script ──");
        print_script(&self.script);
        if let Some(title) = &self.title {
            println!("  Title:       {title}");
        }
        if let Some(description) = &self.description {
            println!("  Description: {description}");
        }
        if let Some(prompt) = &self.thumbnail_prompt {
            println!("  Thumbnail requested. Image prompt:");
            for line in prompt.lines() {
                println!("    {line}");
            }
        }
        println!();
    }
}

pub async fn run(
    script_path: Option<PathBuf>,
    anchor_paths: Vec<PathBuf>,
    message: Option<String>,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let factory = SessionFactory::from_config(&config)?;
    if !factory.is_configured() {
        print_setup_prompt();
        anyhow::bail!("No API key found. See above for setup instructions.");
    }
    let anchors = anchor_slots(anchor_paths)?;

    let mut state = TerminalState {
        script: match &script_path {
            Some(path) => load_script_or_empty(path)?,
            None => MovieScript::default(),
        },
        ..TerminalState::default()
    };

    let Some(mut session) = factory
        .create_session()
        .await
        .context("Failed to start chat session")?
    else {
        anyhow::bail!("Chat session unavailable");
    };

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let result = turn(&mut session, &msg, &anchors, &mut state).await;
        eprint!("\r              \r");
        result?;
        persist(script_path.as_deref(), &mut state)?;
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Reelsmith — Script Assistant");
    println!();
    println!("  Model:     {}", config.model);
    println!("  Script:    {} scenes", state.script.len());
    println!("  Anchors:   {}", anchors.iter().flatten().count());
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'show' to print the script, 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            "exit" | "quit" => break,
            "show" => {
                state.print_summary();
                continue;
            }
            _ => {}
        }

        eprint!("  ...");
        let result = turn(&mut session, line, &anchors, &mut state).await;
        eprint!("\r     \r");
        match result {
            Ok(()) => persist(script_path.as_deref(), &mut state)?,
            Err(e) => {
                // A failed turn can be retried by sending the message again.
                eprintln!("  [Error] {e:#}");
                println!();
            }
        }
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

async fn turn(
    session: &mut ChatSession,
    message: &str,
    anchors: &AnchorImages,
    state: &mut TerminalState,
) -> anyhow::Result<()> {
    let scenes = state.script.scenes.clone();
    let outcome = dispatch(Some(session), message, &scenes, anchors, state).await?;
    if outcome.intent_handled {
        state.print_summary();
    }
    Ok(())
}

fn persist(script_path: Option<&Path>, state: &mut TerminalState) -> anyhow::Result<()> {
    if !state.script_dirty {
        return Ok(());
    }
    match script_path {
        Some(path) => {
            save_script(path, &state.script)?;
            println!("  Saved script to {}", path.display());
            state.script_dirty = false;
        }
        None => warn!("Script changed but no --script file was given; changes are not saved"),
    }
    Ok(())
}
