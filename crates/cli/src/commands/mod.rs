pub mod chat;
pub mod init;
pub mod languages;
pub mod metadata;
pub mod script;
pub mod translate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use reelsmith_assistant::encoder::{ANCHOR_SLOTS, AnchorImages};
use reelsmith_assistant::{Media, OneShotClient};
use reelsmith_config::AppConfig;
use reelsmith_core::provider::Provider;
use reelsmith_core::scene::{MovieScript, Scene};

pub fn load_config() -> anyhow::Result<AppConfig> {
    AppConfig::load().context("Failed to load config")
}

/// Print how to configure a key. Missing credentials are a setup state, not
/// a backend failure, so they get their own message.
pub fn print_setup_prompt() {
    eprintln!();
    eprintln!("  No API key configured.");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    REELSMITH_API_KEY=...");
    eprintln!("    GEMINI_API_KEY=...");
    eprintln!();
    eprintln!("  Or add `api_key` to your config file:");
    eprintln!("    {}", AppConfig::config_path().display());
    eprintln!();
    eprintln!("  Run `reelsmith init` to create it.");
    eprintln!();
}

/// The configured provider, or the setup prompt and an error.
pub fn require_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn Provider>> {
    match reelsmith_providers::build_from_config(config)? {
        Some(provider) => Ok(provider),
        None => {
            print_setup_prompt();
            bail!("No API key found. See above for setup instructions.");
        }
    }
}

pub fn one_shot_client(config: &AppConfig) -> anyhow::Result<OneShotClient> {
    let provider = require_provider(config)?;
    Ok(OneShotClient::new(provider, &config.model).with_temperature(config.temperature))
}

/// Read a script file. Accepts `{"scenes": [...]}` or a bare scene array.
pub fn load_script(path: &Path) -> anyhow::Result<MovieScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(MovieScript::default());
    }
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Script {} is not valid JSON", path.display()))?;
    let script = if value.is_array() {
        MovieScript::new(serde_json::from_value::<Vec<Scene>>(value)?)
    } else {
        serde_json::from_value(value)?
    };
    Ok(script)
}

/// Like [`load_script`], but a missing file is an empty script.
pub fn load_script_or_empty(path: &Path) -> anyhow::Result<MovieScript> {
    if path.exists() {
        load_script(path)
    } else {
        Ok(MovieScript::default())
    }
}

pub fn save_script(path: &Path, script: &MovieScript) -> anyhow::Result<()> {
    let mut script = script.clone();
    script.renumber();
    let json = serde_json::to_string_pretty(&script)?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write script {}", path.display()))?;
    Ok(())
}

/// Fill anchor slots in order from the given paths.
pub fn anchor_slots(paths: Vec<PathBuf>) -> anyhow::Result<AnchorImages> {
    if paths.len() > ANCHOR_SLOTS {
        bail!("At most {ANCHOR_SLOTS} anchor images are supported, got {}", paths.len());
    }
    let mut slots: AnchorImages = Default::default();
    for (slot, path) in slots.iter_mut().zip(paths) {
        *slot = Some(Media::from_path(path));
    }
    Ok(slots)
}

pub fn print_script(script: &MovieScript) {
    if script.is_empty() {
        println!("  (no scenes)");
        return;
    }
    for (i, scene) in script.scenes.iter().enumerate() {
        let number = scene.scene_number.unwrap_or(i as u32 + 1);
        println!("  Scene {number}");
        println!("    Description: {}", scene.description);
        println!("    Narration:   {}", scene.narration);
    }
}
