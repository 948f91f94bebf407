//! Context formatter — renders the current script for grounding the model.

use reelsmith_core::scene::Scene;

/// Placeholder for a missing description or narration.
pub const MISSING_FIELD: &str = "(none)";

/// Lead-in placed before the rendered script in a chat turn.
pub const SCRIPT_CONTEXT_PREAMBLE: &str = "Here is the user's current movie script (for context). \
Each scene has a number, description, and narration. \
Use it to answer questions about specific scenes and suggest improvements.";

/// Lead-in placed before the text when anchor images are attached.
pub const ANCHOR_IMAGES_PREAMBLE: &str =
    "Here are my anchor images (image 1, 2, 3) for style reference:";

/// Render scenes as one block per scene, in order.
///
/// Returns an empty string for an empty script. Blank fields render as
/// [`MISSING_FIELD`] so every scene keeps both labels.
pub fn format_script(scenes: &[Scene]) -> String {
    scenes
        .iter()
        .map(|scene| {
            let number = scene
                .scene_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".into());
            format!(
                "Scene {number}\nDescription: {}\nNarration: {}",
                or_missing(&scene.description),
                or_missing(&scene.narration),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The text of a chat turn: the raw message, or the message behind the
/// script context when there is a script.
pub fn turn_text(message: &str, scenes: &[Scene]) -> String {
    let block = format_script(scenes);
    if block.is_empty() {
        return message.to_string();
    }
    format!("{SCRIPT_CONTEXT_PREAMBLE}\n\n{block}\n\n---\n\nUser message: {message}")
}

fn or_missing(field: &str) -> &str {
    let trimmed = field.trim();
    if trimmed.is_empty() { MISSING_FIELD } else { trimmed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_script_formats_to_empty_string() {
        assert_eq!(format_script(&[]), "");
    }

    #[test]
    fn blank_description_gets_placeholder() {
        let scenes = vec![Scene::new(1, "   ", "The sun rises over the dunes.")];
        let text = format_script(&scenes);
        assert!(text.contains("Description: (none)"));
        assert!(text.contains("Narration: The sun rises over the dunes."));
    }

    #[test]
    fn blocks_follow_scene_order() {
        let scenes = vec![
            Scene::new(1, "a desert", "first"),
            Scene { description: "a city".into(), ..Scene::default() },
        ];
        assert_eq!(
            format_script(&scenes),
            "Scene 1\nDescription: a desert\nNarration: first\n\n\
             Scene ?\nDescription: a city\nNarration: (none)"
        );
    }

    #[test]
    fn formatting_is_deterministic() {
        let scenes = vec![Scene::new(1, "x", "y"), Scene::new(2, "z", "w")];
        assert_eq!(format_script(&scenes), format_script(&scenes));
    }

    #[test]
    fn turn_text_without_script_is_raw_message() {
        assert_eq!(turn_text("make me a reel", &[]), "make me a reel");
    }

    #[test]
    fn turn_text_with_script_wraps_message() {
        let text = turn_text("shorten scene 1", &[Scene::new(1, "d", "n")]);
        assert!(text.starts_with(SCRIPT_CONTEXT_PREAMBLE));
        assert!(text.contains("Scene 1\nDescription: d"));
        assert!(text.ends_with("User message: shorten scene 1"));
    }
}
