//! Tool schema registry — the five capabilities the assistant may invoke.
//!
//! The same registry is advertised to the backend and consulted when
//! classifying a response.

use reelsmith_core::tool::{ToolDeclaration, ToolRegistry};
use std::sync::LazyLock;

pub const GENERATE_MOVIE_SCRIPT: &str = "generateMovieScript";
pub const TRANSLATE_NARRATIONS: &str = "translateNarrations";
pub const GENERATE_YOUTUBE_TITLE: &str = "generateYouTubeTitle";
pub const GENERATE_YOUTUBE_DESCRIPTION: &str = "generateYouTubeDescription";
pub const GENERATE_YOUTUBE_THUMBNAIL: &str = "generateYouTubeThumbnail";

static CHAT_TOOLS: LazyLock<ToolRegistry> = LazyLock::new(|| {
    ToolRegistry::new(vec![
        movie_script_tool(),
        translate_narrations_tool(),
        youtube_title_tool(),
        youtube_description_tool(),
        youtube_thumbnail_tool(),
    ])
});

static MOVIE_TOOLS: LazyLock<ToolRegistry> =
    LazyLock::new(|| CHAT_TOOLS.subset(&[GENERATE_MOVIE_SCRIPT]));

/// All five tools, in declaration order. Bound to every chat session.
pub fn chat_tools() -> &'static ToolRegistry {
    &CHAT_TOOLS
}

/// Only `generateMovieScript`, for one-shot script generation without a session.
pub fn movie_tools() -> &'static ToolRegistry {
    &MOVIE_TOOLS
}

fn movie_script_tool() -> ToolDeclaration {
    ToolDeclaration::new(
        GENERATE_MOVIE_SCRIPT,
        "Writes the generated movie script with scenes into the scene editor. \
         Call this when the user has described their idea and you are ready to produce the script.",
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "scenes": {
                    "type": "ARRAY",
                    "description": "Array of scene objects for the video reel",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "sceneNumber": {
                                "type": "INTEGER",
                                "description": "Scene number (1-based index)"
                            },
                            "description": {
                                "type": "STRING",
                                "description": "Vivid visual description for image generation"
                            },
                            "narration": {
                                "type": "STRING",
                                "description": "Narration text with optional TTS tags like [excited] or [whispering]"
                            }
                        },
                        "required": ["sceneNumber", "description", "narration"]
                    }
                }
            },
            "required": ["scenes"]
        }),
    )
}

fn translate_narrations_tool() -> ToolDeclaration {
    ToolDeclaration::new(
        TRANSLATE_NARRATIONS,
        "Call this when the user wants to translate the narrations to another language. \
         Pass the target language and the array of translated narration texts in scene order; \
         this will update the scene editor.",
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "targetLanguage": {
                    "type": "STRING",
                    "description": "Target language name or code (e.g. Spanish, es, French)"
                },
                "translatedNarrations": {
                    "type": "ARRAY",
                    "description": "Array of translated narration strings, one per scene in order",
                    "items": { "type": "STRING" }
                }
            },
            "required": ["targetLanguage", "translatedNarrations"]
        }),
    )
}

fn youtube_title_tool() -> ToolDeclaration {
    ToolDeclaration::new(
        GENERATE_YOUTUBE_TITLE,
        "Call when the user wants a YouTube title. Use the current script and images \
         (provided in context) to suggest one catchy title. Pass the result in the title parameter.",
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "title": {
                    "type": "STRING",
                    "description": "The suggested YouTube video title"
                }
            },
            "required": ["title"]
        }),
    )
}

fn youtube_description_tool() -> ToolDeclaration {
    ToolDeclaration::new(
        GENERATE_YOUTUBE_DESCRIPTION,
        "Call when the user wants a YouTube description. Use the current script and images \
         (provided in context) to write a short description. Pass the result in the description parameter.",
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "description": {
                    "type": "STRING",
                    "description": "The YouTube video description (e.g. 1-2 paragraphs)"
                }
            },
            "required": ["description"]
        }),
    )
}

fn youtube_thumbnail_tool() -> ToolDeclaration {
    ToolDeclaration::new(
        GENERATE_YOUTUBE_THUMBNAIL,
        "Call when the user wants a YouTube thumbnail. The app will generate an image using \
         the current script and images and display it in the YouTube section.",
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "imagePrompt": {
                    "type": "STRING",
                    "description": "Optional override prompt for the thumbnail image; if omitted, app uses script and images."
                }
            },
            "required": []
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_registry_has_five_tools_in_order() {
        assert_eq!(
            chat_tools().names(),
            vec![
                GENERATE_MOVIE_SCRIPT,
                TRANSLATE_NARRATIONS,
                GENERATE_YOUTUBE_TITLE,
                GENERATE_YOUTUBE_DESCRIPTION,
                GENERATE_YOUTUBE_THUMBNAIL,
            ]
        );
    }

    #[test]
    fn movie_registry_is_script_tool_only() {
        assert_eq!(movie_tools().names(), vec![GENERATE_MOVIE_SCRIPT]);
        assert_eq!(
            movie_tools().get(GENERATE_MOVIE_SCRIPT),
            chat_tools().get(GENERATE_MOVIE_SCRIPT)
        );
    }

    #[test]
    fn required_fields_match_declarations() {
        let tools = chat_tools();
        assert_eq!(tools.get(GENERATE_MOVIE_SCRIPT).unwrap().required_fields(), vec!["scenes"]);
        assert_eq!(
            tools.get(TRANSLATE_NARRATIONS).unwrap().required_fields(),
            vec!["targetLanguage", "translatedNarrations"]
        );
        assert!(tools.get(GENERATE_YOUTUBE_THUMBNAIL).unwrap().required_fields().is_empty());
    }

    #[test]
    fn scene_items_require_all_fields() {
        let decl = chat_tools().get(GENERATE_MOVIE_SCRIPT).unwrap();
        let items = &decl.parameters["properties"]["scenes"]["items"];
        assert_eq!(items["properties"]["sceneNumber"]["type"], "INTEGER");
        assert_eq!(items["required"].as_array().unwrap().len(), 3);
    }
}
