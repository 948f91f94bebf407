//! Direct, session-less requests: script generation, narration translation
//! and YouTube metadata.
//!
//! None of these keep history or go through the dispatcher. The backend is
//! asked for exactly the field wanted.

use std::sync::Arc;

use reelsmith_core::error::{Error, ProviderError, Result};
use reelsmith_core::languages::find_language;
use reelsmith_core::message::{Message, Part, Role};
use reelsmith_core::provider::{Provider, ProviderRequest, ToolMode};
use reelsmith_core::scene::{MovieScript, Scene};
use tracing::{debug, info, warn};

use crate::context::format_script;
use crate::encoder::{Media, encode_anchor_images};
use crate::fallback::extract_script;
use crate::intent::Intent;
use crate::tools::movie_tools;

const SCRIPT_INSTRUCTION: &str = "You write short movie scripts for video reels. \
Each scene needs a vivid visual description for image generation and a narration line. \
Narrations may carry TTS tags like [excited] or [whispering]. \
Always deliver the script by calling generateMovieScript.";

const JSON_MIME_TYPE: &str = "application/json";

/// Client for one-shot requests against a provider.
pub struct OneShotClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: Option<f32>,
}

impl OneShotClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Generate a script from a prompt.
    ///
    /// Only `generateMovieScript` is advertised and the backend is required
    /// to call it. A text answer still goes through the fallback extractor.
    /// `Ok(None)` means nothing usable came back.
    pub async fn generate_script(&self, prompt: &str) -> Result<Option<MovieScript>> {
        let tools = movie_tools();
        let request = ProviderRequest {
            system_instruction: Some(SCRIPT_INSTRUCTION.into()),
            tools: tools.declarations().to_vec(),
            tool_mode: ToolMode::Any,
            ..self.request(Message::user(prompt))
        };

        let response = self.provider.complete(request).await?;

        for call in response.invocations() {
            match Intent::from_invocation(&call, tools) {
                Ok(Intent::ReplaceScript(script)) => {
                    info!(scenes = script.len(), "Script generated");
                    return Ok(Some(script));
                }
                Ok(other) => warn!(kind = ?other.kind(), "Unexpected intent during script generation"),
                Err(skip) => warn!("Skipping invocation: {skip}"),
            }
        }

        let script = extract_script(&response.text());
        if let Some(script) = &script {
            info!(scenes = script.len(), "Script recovered from text");
        }
        Ok(script)
    }

    /// Translate narrations, keeping TTS tags.
    ///
    /// The result always has one entry per input narration: entries the
    /// backend left out keep the original text and extra entries are dropped.
    /// `target_language` may be a code or a label from the language table;
    /// anything else is passed through as given.
    pub async fn translate_narrations(
        &self,
        narrations: &[String],
        target_language: &str,
    ) -> Result<Vec<String>> {
        if narrations.is_empty() {
            return Ok(Vec::new());
        }

        let language = find_language(target_language)
            .map(|l| l.label)
            .unwrap_or(target_language);
        let source = serde_json::to_string_pretty(narrations)?;
        let prompt = format!(
            "Translate each of the following {count} video narrations into {language}. \
             Keep TTS tags such as [excited] or [whispering] unchanged and in place. \
             Reply with only a JSON array of {count} strings, in the same order.\n\n{source}",
            count = narrations.len(),
        );

        let request = ProviderRequest {
            response_mime_type: Some(JSON_MIME_TYPE.into()),
            ..self.request(Message::user(prompt))
        };
        let response = self.provider.complete(request).await?;
        let text = response.text();

        let translated = parse_string_array(&text).ok_or_else(|| {
            Error::Provider(ProviderError::InvalidResponse(format!(
                "expected a JSON array of strings, got: {}",
                truncate(&text, 120)
            )))
        })?;

        if translated.len() != narrations.len() {
            warn!(
                expected = narrations.len(),
                got = translated.len(),
                "Translation count mismatch; aligning to scenes"
            );
        }

        Ok(align(narrations, translated))
    }

    /// One catchy title for the script, without surrounding quotes.
    pub async fn generate_youtube_title(
        &self,
        scenes: &[Scene],
        anchors: &[Option<Media>],
    ) -> Result<String> {
        let prompt = format!(
            "Based on this video script{}, suggest one catchy YouTube title. \
             Reply with only the title.\n\n{}",
            images_clause(anchors),
            script_context(scenes)
        );
        let text = self.metadata_request(prompt, anchors).await?;
        Ok(strip_quotes(&text).to_string())
    }

    /// A short YouTube description for the script.
    pub async fn generate_youtube_description(
        &self,
        scenes: &[Scene],
        anchors: &[Option<Media>],
    ) -> Result<String> {
        let prompt = format!(
            "Based on this video script{}, write a short YouTube description \
             (1-2 paragraphs). Reply with only the description.\n\n{}",
            images_clause(anchors),
            script_context(scenes)
        );
        self.metadata_request(prompt, anchors).await
    }

    async fn metadata_request(&self, prompt: String, anchors: &[Option<Media>]) -> Result<String> {
        let mut parts = vec![Part::text(prompt)];
        parts.extend(encode_anchor_images(anchors).await?);
        let response = self
            .provider
            .complete(self.request(Message::new(Role::User, parts)))
            .await?;
        let text = response.text();
        debug!(len = text.len(), "Metadata generated");
        Ok(text)
    }

    fn request(&self, message: Message) -> ProviderRequest {
        ProviderRequest {
            temperature: self.temperature,
            ..ProviderRequest::single_turn(self.model.clone(), message)
        }
    }
}

/// Text handed to the external image service for a thumbnail.
///
/// An explicit override wins; otherwise the prompt is derived from the
/// script context.
pub fn thumbnail_prompt(script_context: &str, override_prompt: Option<&str>) -> String {
    if let Some(prompt) = override_prompt.map(str::trim).filter(|p| !p.is_empty()) {
        return prompt.to_string();
    }
    format!(
        "Create an eye-catching YouTube thumbnail image for this video. \
         Bold composition, vibrant colors, no text overlay. Match the style of \
         the reference images if provided.\n\n{script_context}"
    )
}

/// The script rendered for metadata prompts.
pub fn script_context(scenes: &[Scene]) -> String {
    let block = format_script(scenes);
    if block.is_empty() {
        "(empty script)".to_string()
    } else {
        block
    }
}

fn images_clause(anchors: &[Option<Media>]) -> &'static str {
    if crate::encoder::has_anchor_images(anchors) {
        " and the attached style images"
    } else {
        ""
    }
}

fn parse_string_array(text: &str) -> Option<Vec<String>> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(trimmed).ok()
}

fn align(original: &[String], translated: Vec<String>) -> Vec<String> {
    let mut translated = translated.into_iter();
    original
        .iter()
        .map(|o| translated.next().unwrap_or_else(|| o.clone()))
        .collect()
}

fn strip_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”')] {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    trimmed
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
