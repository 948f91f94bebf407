//! The movie script model.
//!
//! A script is an ordered list of scenes. Order is significant: by
//! convention `scene_number` is the index + 1, though uniqueness is not
//! enforced here. A new script always replaces the previous one wholesale.

use serde::{Deserialize, Deserializer, Serialize};

/// One unit of the movie script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// 1-based position in the script, when known
    #[serde(
        default,
        deserialize_with = "lenient_scene_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub scene_number: Option<u32>,

    /// Visual description used for image generation
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    /// Narration text, optionally carrying TTS tags like `[excited]`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub narration: String,

    /// Keys this model does not know, carried through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Scene {
    pub fn new(
        scene_number: u32,
        description: impl Into<String>,
        narration: impl Into<String>,
    ) -> Self {
        Self {
            scene_number: Some(scene_number),
            description: description.into(),
            narration: narration.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// The script payload carried by a `generateMovieScript` invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieScript {
    pub scenes: Vec<Scene>,
}

impl MovieScript {
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Narrations in scene order.
    pub fn narrations(&self) -> Vec<String> {
        self.scenes.iter().map(|s| s.narration.clone()).collect()
    }

    /// Overwrite narrations positionally.
    ///
    /// Entry `i` replaces scene `i`'s narration; entries past the last scene
    /// are ignored and scenes past the last entry keep their narration.
    /// Returns how many scenes were updated.
    pub fn apply_translation(&mut self, narrations: &[String]) -> usize {
        let mut updated = 0;
        for (scene, text) in self.scenes.iter_mut().zip(narrations) {
            scene.narration = text.clone();
            updated += 1;
        }
        updated
    }

    /// Give every scene without a number its index + 1.
    pub fn renumber(&mut self) {
        for (i, scene) in self.scenes.iter_mut().enumerate() {
            if scene.scene_number.is_none() {
                scene.scene_number = Some(i as u32 + 1);
            }
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Backends sometimes send integers as floats (`1.0`) or strings (`"1"`).
fn lenient_scene_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match &value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok()))
}
