//! Intents — typed, validated forms of recognized tool invocations.
//!
//! Every invocation is classified as either a recognized `Intent` or a
//! `Skip` carrying the reason. Skips are logged by the dispatcher and never
//! surface as errors.

use reelsmith_core::scene::MovieScript;
use reelsmith_core::tool::{ToolInvocation, ToolRegistry};
use serde::{Deserialize, Serialize};

use crate::tools::{
    GENERATE_MOVIE_SCRIPT, GENERATE_YOUTUBE_DESCRIPTION, GENERATE_YOUTUBE_THUMBNAIL,
    GENERATE_YOUTUBE_TITLE, TRANSLATE_NARRATIONS,
};

/// The kinds of intent the assistant can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    ReplaceScript,
    ApplyTranslation,
    SetTitle,
    SetDescription,
    RequestThumbnail,
}

impl IntentKind {
    /// Map a tool name to its intent kind.
    pub fn from_tool_name(name: &str) -> Option<Self> {
        match name {
            GENERATE_MOVIE_SCRIPT => Some(Self::ReplaceScript),
            TRANSLATE_NARRATIONS => Some(Self::ApplyTranslation),
            GENERATE_YOUTUBE_TITLE => Some(Self::SetTitle),
            GENERATE_YOUTUBE_DESCRIPTION => Some(Self::SetDescription),
            GENERATE_YOUTUBE_THUMBNAIL => Some(Self::RequestThumbnail),
            _ => None,
        }
    }

    pub fn tool_name(self) -> &'static str {
        match self {
            Self::ReplaceScript => GENERATE_MOVIE_SCRIPT,
            Self::ApplyTranslation => TRANSLATE_NARRATIONS,
            Self::SetTitle => GENERATE_YOUTUBE_TITLE,
            Self::SetDescription => GENERATE_YOUTUBE_DESCRIPTION,
            Self::RequestThumbnail => GENERATE_YOUTUBE_THUMBNAIL,
        }
    }

    /// The fixed confirmation shown to the user when this intent is applied.
    pub fn confirmation(self) -> &'static str {
        match self {
            Self::ReplaceScript => {
                "I've added the script to your scene editor. You can review and edit it there, \
                 then generate images and audio for each scene."
            }
            Self::ApplyTranslation => "I've updated the narrations with the translation.",
            Self::SetTitle => "I've set the YouTube title.",
            Self::SetDescription => "I've set the YouTube description.",
            Self::RequestThumbnail => {
                "I've triggered thumbnail generation; it will appear in the YouTube section."
            }
        }
    }
}

/// Arguments of `translateNarrations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationPayload {
    pub target_language: String,
    /// Positionally aligned to the caller's current scene order
    pub translated_narrations: Vec<String>,
}

/// Arguments of `generateYouTubeThumbnail`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
}

#[derive(Deserialize)]
struct TitleArgs {
    title: String,
}

#[derive(Deserialize)]
struct DescriptionArgs {
    description: String,
}

/// A recognized, validated invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    ReplaceScript(MovieScript),
    ApplyTranslation(TranslationPayload),
    SetTitle(String),
    SetDescription(String),
    RequestThumbnail(ThumbnailRequest),
}

/// Why an invocation was not turned into an intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Skip {
    /// The name is not advertised by the session's registry
    UnknownTool(String),
    /// Required arguments are missing or have the wrong shape
    InvalidArguments { tool: String, reason: String },
}

impl std::fmt::Display for Skip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Skip::UnknownTool(name) => write!(f, "unknown tool '{name}'"),
            Skip::InvalidArguments { tool, reason } => {
                write!(f, "invalid arguments for '{tool}': {reason}")
            }
        }
    }
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::ReplaceScript(_) => IntentKind::ReplaceScript,
            Intent::ApplyTranslation(_) => IntentKind::ApplyTranslation,
            Intent::SetTitle(_) => IntentKind::SetTitle,
            Intent::SetDescription(_) => IntentKind::SetDescription,
            Intent::RequestThumbnail(_) => IntentKind::RequestThumbnail,
        }
    }

    /// Classify an invocation against the registry it was advertised from.
    pub fn from_invocation(call: &ToolInvocation, registry: &ToolRegistry) -> Result<Self, Skip> {
        let kind = registry
            .contains(&call.name)
            .then(|| IntentKind::from_tool_name(&call.name))
            .flatten()
            .ok_or_else(|| Skip::UnknownTool(call.name.clone()))?;

        let invalid = |e: serde_json::Error| Skip::InvalidArguments {
            tool: call.name.clone(),
            reason: e.to_string(),
        };

        let intent = match kind {
            IntentKind::ReplaceScript => {
                Intent::ReplaceScript(parse_args(&call.arguments).map_err(invalid)?)
            }
            IntentKind::ApplyTranslation => {
                Intent::ApplyTranslation(parse_args(&call.arguments).map_err(invalid)?)
            }
            IntentKind::SetTitle => {
                Intent::SetTitle(parse_args::<TitleArgs>(&call.arguments).map_err(invalid)?.title)
            }
            IntentKind::SetDescription => Intent::SetDescription(
                parse_args::<DescriptionArgs>(&call.arguments)
                    .map_err(invalid)?
                    .description,
            ),
            IntentKind::RequestThumbnail => {
                // Absent or malformed arguments fall back to "use script and images".
                let request = if call.arguments.is_null() {
                    ThumbnailRequest::default()
                } else {
                    parse_args(&call.arguments).unwrap_or_default()
                };
                Intent::RequestThumbnail(request)
            }
        };
        Ok(intent)
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(
    arguments: &serde_json::Value,
) -> Result<T, serde_json::Error> {
    T::deserialize(arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{chat_tools, movie_tools};
    use serde_json::json;

    fn classify(name: &str, args: serde_json::Value) -> Result<Intent, Skip> {
        Intent::from_invocation(&ToolInvocation::new(name, args), chat_tools())
    }

    #[test]
    fn script_invocation_keeps_scenes_unchanged() {
        let intent = classify(
            GENERATE_MOVIE_SCRIPT,
            json!({"scenes": [{"sceneNumber": 1, "description": "a", "narration": "b"}]}),
        )
        .unwrap();
        let Intent::ReplaceScript(script) = intent else {
            panic!("expected script");
        };
        assert_eq!(script.scenes.len(), 1);
        assert_eq!(script.scenes[0].description, "a");
        assert_eq!(script.scenes[0].scene_number, Some(1));
    }

    #[test]
    fn script_without_scenes_is_skipped() {
        let skip = classify(GENERATE_MOVIE_SCRIPT, json!({})).unwrap_err();
        assert!(matches!(skip, Skip::InvalidArguments { .. }));
    }

    #[test]
    fn translation_requires_both_fields() {
        assert!(classify(TRANSLATE_NARRATIONS, json!({"targetLanguage": "es"})).is_err());
        let intent = classify(
            TRANSLATE_NARRATIONS,
            json!({"targetLanguage": "es", "translatedNarrations": ["hola"]}),
        )
        .unwrap();
        assert_eq!(intent.kind(), IntentKind::ApplyTranslation);
    }

    #[test]
    fn title_and_description_extract_text() {
        assert_eq!(
            classify(GENERATE_YOUTUBE_TITLE, json!({"title": "Dune Dreams"})).unwrap(),
            Intent::SetTitle("Dune Dreams".into())
        );
        assert_eq!(
            classify(GENERATE_YOUTUBE_DESCRIPTION, json!({"description": "A reel."})).unwrap(),
            Intent::SetDescription("A reel.".into())
        );
        assert!(classify(GENERATE_YOUTUBE_TITLE, json!({"title": null})).is_err());
    }

    #[test]
    fn thumbnail_tolerates_missing_arguments() {
        assert_eq!(
            classify(GENERATE_YOUTUBE_THUMBNAIL, serde_json::Value::Null).unwrap(),
            Intent::RequestThumbnail(ThumbnailRequest::default())
        );
        assert_eq!(
            classify(GENERATE_YOUTUBE_THUMBNAIL, json!({"imagePrompt": "neon"})).unwrap(),
            Intent::RequestThumbnail(ThumbnailRequest {
                image_prompt: Some("neon".into())
            })
        );
    }

    #[test]
    fn unknown_name_is_skipped() {
        let skip = classify("deleteEverything", json!({})).unwrap_err();
        assert_eq!(skip, Skip::UnknownTool("deleteEverything".into()));
    }

    #[test]
    fn name_outside_registry_is_skipped() {
        let call = ToolInvocation::new(GENERATE_YOUTUBE_TITLE, json!({"title": "t"}));
        let skip = Intent::from_invocation(&call, movie_tools()).unwrap_err();
        assert!(matches!(skip, Skip::UnknownTool(_)));
    }

    #[test]
    fn kinds_roundtrip_through_tool_names() {
        for kind in [
            IntentKind::ReplaceScript,
            IntentKind::ApplyTranslation,
            IntentKind::SetTitle,
            IntentKind::SetDescription,
            IntentKind::RequestThumbnail,
        ] {
            assert_eq!(IntentKind::from_tool_name(kind.tool_name()), Some(kind));
        }
    }
}
