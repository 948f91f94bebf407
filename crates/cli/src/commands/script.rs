//! `reelsmith script` — One-shot script generation.

use std::path::PathBuf;

use super::{load_config, one_shot_client, print_script, save_script};

pub async fn run(prompt: String, out: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = one_shot_client(&config)?;

    eprint!("  Writing script...");
    let result = client.generate_script(&prompt).await;
    eprint!("\r                  \r");

    let Some(mut script) = result? else {
        anyhow::bail!("The backend did not return a usable script; try rephrasing the prompt.");
    };
    script.renumber();

    match out {
        Some(path) => {
            save_script(&path, &script)?;
            println!("  Wrote {} scenes to {}", script.len(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&script)?),
    }
    print_script(&script);
    Ok(())
}
