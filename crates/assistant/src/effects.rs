//! Effect callbacks — how the dispatcher mutates caller-owned state.
//!
//! The assistant holds no script, title or thumbnail state of its own. Every
//! recognized intent is handed to the caller through this trait, which owns
//! whatever state those intents change.

use reelsmith_core::scene::MovieScript;

use crate::intent::{Intent, ThumbnailRequest, TranslationPayload};

/// Caller-supplied mutation callbacks.
pub trait Effects: Send {
    /// Replace the whole script. There is no merge with the previous one.
    fn on_script_replace(&mut self, script: MovieScript);

    fn on_translation_apply(&mut self, payload: TranslationPayload);

    fn on_title_set(&mut self, title: String);

    fn on_description_set(&mut self, description: String);

    fn on_thumbnail_requested(&mut self, request: ThumbnailRequest);

    /// Receives the turn's final confirmation or reply text.
    ///
    /// Fires exactly once per successful turn with the complete text, never
    /// with partial tokens. The default ignores it.
    fn on_incremental_text(&mut self, _text: &str) {}
}

/// Route one intent to its callback.
pub fn apply(effects: &mut dyn Effects, intent: Intent) {
    match intent {
        Intent::ReplaceScript(script) => effects.on_script_replace(script),
        Intent::ApplyTranslation(payload) => effects.on_translation_apply(payload),
        Intent::SetTitle(title) => effects.on_title_set(title),
        Intent::SetDescription(description) => effects.on_description_set(description),
        Intent::RequestThumbnail(request) => effects.on_thumbnail_requested(request),
    }
}
