//! Fallback script extractor.
//!
//! Backends sometimes answer with a JSON script in prose instead of calling
//! `generateMovieScript`. This recovers such a script on a best-effort basis
//! and never fails: anything it cannot make sense of is simply `None`.

use reelsmith_core::scene::{MovieScript, Scene};
use serde_json::Value;

/// Try to recover a script from free-form text.
pub fn extract_script(text: &str) -> Option<MovieScript> {
    let cleaned = strip_code_fences(text);
    // A single scene may still contain brackets, e.g. TTS tags in its narration.
    let parsed = array_span(&cleaned)
        .and_then(parse_span)
        .filter(Value::is_array)
        .or_else(|| object_span(&cleaned).and_then(parse_span))?;

    let entries = match parsed {
        Value::Array(items) => items,
        Value::Object(_) => vec![parsed],
        _ => return None,
    };

    let scenes: Vec<Scene> = entries
        .into_iter()
        .filter(has_description_or_narration)
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();

    if scenes.is_empty() {
        None
    } else {
        Some(MovieScript::new(scenes))
    }
}

fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "")
}

/// From the first `[` to the last `]`.
fn array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// From the first `{` to the last `}`, for a bare single scene.
fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_span(span: &str) -> Option<Value> {
    match serde_json::from_str(span) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Fallback span is not valid JSON");
            None
        }
    }
}

/// Any non-empty string counts, whitespace included.
fn has_description_or_narration(entry: &Value) -> bool {
    let non_empty = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty())
    };
    entry.is_object() && (non_empty("description") || non_empty("narration"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_array_is_recovered() {
        let text = "```json\n[{\"description\":\"a\",\"narration\":\"b\"}]\n```";
        let script = extract_script(text).unwrap();
        assert_eq!(script.scenes, vec![Scene {
            scene_number: None,
            description: "a".into(),
            narration: "b".into(),
            ..Scene::default()
        }]);
    }

    #[test]
    fn array_inside_prose_is_recovered() {
        let text = "Sure! Here is your script:\n[{\"sceneNumber\":1,\"description\":\"x\",\"narration\":\"y\"},\
                    {\"sceneNumber\":2,\"description\":\"z\",\"narration\":\"w\"}]\nEnjoy.";
        let script = extract_script(text).unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script.scenes[1].scene_number, Some(2));
    }

    #[test]
    fn single_object_is_normalized_to_array() {
        let script = extract_script(r#"{"description":"lone scene","narration":""}"#).unwrap();
        assert_eq!(script.len(), 1);
        assert_eq!(script.scenes[0].description, "lone scene");
    }

    #[test]
    fn entries_without_content_are_filtered() {
        let text = r#"[{"sceneNumber":1},{"description":"kept"},"noise",{"narration":""}]"#;
        let script = extract_script(text).unwrap();
        assert_eq!(script.len(), 1);
        assert_eq!(script.scenes[0].description, "kept");
    }

    #[test]
    fn whitespace_only_field_still_counts_as_content() {
        let script = extract_script(r#"[{"description":"  "}]"#).unwrap();
        assert_eq!(script.len(), 1);
        assert_eq!(script.scenes[0].description, "  ");
    }

    #[test]
    fn single_object_with_tts_tag_is_recovered() {
        let bare = r#"{"sceneNumber":1,"description":"a fox","narration":"[excited] Run!"}"#;
        let script = extract_script(bare).unwrap();
        assert_eq!(script.len(), 1);
        assert_eq!(script.scenes[0].narration, "[excited] Run!");

        let fenced = "Here you go:\n```json\n{\"description\":\"a fox\",\"narration\":\"[whispering] Hush.\"}\n```";
        let script = extract_script(fenced).unwrap();
        assert_eq!(script.scenes[0].narration, "[whispering] Hush.");
    }

    #[test]
    fn tagged_array_is_still_read_as_array() {
        let text = r#"[{"narration":"[sad] Goodbye."},{"narration":"[excited] Hello!"}]"#;
        let script = extract_script(text).unwrap();
        assert_eq!(script.narrations(), vec!["[sad] Goodbye.", "[excited] Hello!"]);
    }

    #[test]
    fn plain_text_yields_none() {
        assert_eq!(extract_script("hello there"), None);
        assert_eq!(extract_script(""), None);
    }

    #[test]
    fn malformed_json_yields_none() {
        assert_eq!(extract_script("[{\"description\": \"a\",]"), None);
        assert_eq!(extract_script("see [1] and [2]"), None);
    }

    #[test]
    fn array_of_empty_entries_yields_none() {
        assert_eq!(extract_script("[{}, {\"sceneNumber\": 3}]"), None);
    }
}
