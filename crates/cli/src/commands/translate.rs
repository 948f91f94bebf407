//! `reelsmith translate` — Translate a script's narrations.

use std::path::PathBuf;

use reelsmith_core::languages::find_language;
use tracing::warn;

use super::{load_config, load_script, one_shot_client, save_script};

pub async fn run(script_path: PathBuf, lang: Option<String>, apply: bool) -> anyhow::Result<()> {
    let config = load_config()?;
    let mut script = load_script(&script_path)?;
    if script.is_empty() {
        anyhow::bail!("{} has no scenes to translate", script_path.display());
    }

    let target = lang.unwrap_or_else(|| config.translation.default_language.clone());
    let label = match find_language(&target) {
        Some(language) => language.label.to_string(),
        None => {
            warn!(language = %target, "Not a listed language; passing it through as given");
            target.clone()
        }
    };

    let client = one_shot_client(&config)?;
    eprint!("  Translating to {label}...");
    let result = client.translate_narrations(&script.narrations(), &target).await;
    eprint!("\r{}\r", " ".repeat(label.len() + 20));
    let translated = result?;

    for (i, (scene, text)) in script.scenes.iter().zip(&translated).enumerate() {
        let number = scene.scene_number.unwrap_or(i as u32 + 1);
        println!("  Scene {number}");
        println!("    {}", scene.narration);
        println!("    → {text}");
    }

    if apply {
        script.apply_translation(&translated);
        save_script(&script_path, &script)?;
        println!("\n  Applied {label} narrations to {}", script_path.display());
    }
    Ok(())
}
