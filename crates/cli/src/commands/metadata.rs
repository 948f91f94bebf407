//! `reelsmith title` / `reelsmith description` — YouTube metadata.

use std::path::PathBuf;

use super::{anchor_slots, load_config, load_script, one_shot_client};

#[derive(Debug, Clone, Copy)]
pub enum Field {
    Title,
    Description,
}

pub async fn run(field: Field, script_path: PathBuf, anchor_paths: Vec<PathBuf>) -> anyhow::Result<()> {
    let config = load_config()?;
    let script = load_script(&script_path)?;
    let anchors = anchor_slots(anchor_paths)?;
    let client = one_shot_client(&config)?;

    let text = match field {
        Field::Title => client.generate_youtube_title(&script.scenes, &anchors).await?,
        Field::Description => {
            client
                .generate_youtube_description(&script.scenes, &anchors)
                .await?
        }
    };
    println!("{text}");
    Ok(())
}
