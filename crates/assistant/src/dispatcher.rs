//! Message dispatcher — one user turn from request assembly to effects.
//!
//! A turn builds a (possibly multi-part) user message, sends it on the chat
//! session, classifies the complete response into an [`AssistantReply`] and
//! hands each recognized intent to the caller's [`Effects`]. Malformed or
//! unknown output never fails a turn; it degrades to plain text.

use std::collections::HashSet;

use reelsmith_core::error::{Error, Result};
use reelsmith_core::message::{Message, Part, Role};
use reelsmith_core::provider::ProviderResponse;
use reelsmith_core::scene::{MovieScript, Scene};
use reelsmith_core::tool::{ToolInvocation, ToolRegistry};
use tracing::{debug, info, warn};

use crate::context::{ANCHOR_IMAGES_PREAMBLE, turn_text};
use crate::effects::{self, Effects};
use crate::encoder::{Media, encode_anchor_images, has_anchor_images};
use crate::fallback::extract_script;
use crate::intent::{Intent, IntentKind};
use crate::session::ChatSession;

/// What the caller gets back from one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The confirmation for an applied intent, or the model's reply text
    pub text: String,
    /// Whether an effect callback ran this turn
    pub intent_handled: bool,
}

impl DispatchOutcome {
    fn handled(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            intent_handled: true,
        }
    }

    fn unhandled(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            intent_handled: false,
        }
    }
}

/// The three shapes a response can take.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantReply {
    /// One or more tool invocations, in response order, plus any text
    Invocations {
        calls: Vec<ToolInvocation>,
        text: String,
    },
    /// Prose that carries a recoverable script
    EmbeddedScript(MovieScript),
    /// Anything else, possibly empty
    Text(String),
}

impl AssistantReply {
    /// Classify a complete response.
    pub fn classify(response: &ProviderResponse) -> Self {
        let calls = response.invocations();
        let text = response.text();
        if calls.is_empty() {
            Self::from_text(text)
        } else {
            Self::Invocations { calls, text }
        }
    }

    /// Classify text that carried no usable invocation.
    pub fn from_text(text: String) -> Self {
        match extract_script(&text) {
            Some(script) => Self::EmbeddedScript(script),
            None => Self::Text(text),
        }
    }
}

/// Run one assistant turn.
///
/// Fails with `Error::NotConfigured` when there is no session, before any
/// media is read or request sent. Backend and media failures propagate;
/// nothing is retried.
pub async fn dispatch(
    session: Option<&mut ChatSession>,
    message: &str,
    scenes: &[Scene],
    anchors: &[Option<Media>],
    effects: &mut dyn Effects,
) -> Result<DispatchOutcome> {
    let Some(session) = session else {
        return Err(Error::NotConfigured("backend not configured".into()));
    };

    let user_message = build_turn_message(message, scenes, anchors).await?;
    let response = session.send(user_message).await?;

    let reply = AssistantReply::classify(&response);
    let outcome = handle_reply(reply, session.tools(), effects);

    effects.on_incremental_text(&outcome.text);
    Ok(outcome)
}

/// Assemble the user turn: plain text, or a text part plus one inline part
/// per filled anchor slot.
pub async fn build_turn_message(
    message: &str,
    scenes: &[Scene],
    anchors: &[Option<Media>],
) -> Result<Message> {
    let text = turn_text(message, scenes);
    if !has_anchor_images(anchors) {
        return Ok(Message::user(text));
    }

    let mut parts = vec![Part::text(format!("{ANCHOR_IMAGES_PREAMBLE}\n\n{text}"))];
    parts.extend(encode_anchor_images(anchors).await?);
    Ok(Message::new(Role::User, parts))
}

fn handle_reply(
    reply: AssistantReply,
    registry: &ToolRegistry,
    effects: &mut dyn Effects,
) -> DispatchOutcome {
    match reply {
        AssistantReply::Invocations { calls, text } => {
            info!(
                count = calls.len(),
                names = ?calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                "Response carried tool invocations"
            );
            match handle_invocations(&calls, registry, effects) {
                Some(outcome) => outcome,
                None => {
                    debug!("No invocation was actionable; treating response as text");
                    handle_reply(AssistantReply::from_text(text), registry, effects)
                }
            }
        }
        AssistantReply::EmbeddedScript(script) => {
            info!(scenes = script.len(), "Recovered script from response text");
            effects.on_script_replace(script);
            DispatchOutcome::handled(IntentKind::ReplaceScript.confirmation())
        }
        AssistantReply::Text(text) => {
            debug!(len = text.len(), "Plain text reply");
            DispatchOutcome::unhandled(text)
        }
    }
}

/// Apply every recognized invocation in order. The confirmation is the one
/// of the first recognized invocation; `None` if nothing was recognized.
fn handle_invocations(
    calls: &[ToolInvocation],
    registry: &ToolRegistry,
    effects: &mut dyn Effects,
) -> Option<DispatchOutcome> {
    let mut confirmation: Option<&'static str> = None;
    let mut seen: HashSet<IntentKind> = HashSet::new();

    for call in calls {
        let intent = match Intent::from_invocation(call, registry) {
            Ok(intent) => intent,
            Err(skip) => {
                warn!(tool = %call.name, "Skipping invocation: {skip}");
                continue;
            }
        };

        let kind = intent.kind();
        if !seen.insert(kind) {
            warn!(tool = %call.name, "Repeated invocation kind in one turn; keeping first confirmation");
        }
        confirmation.get_or_insert(kind.confirmation());

        debug!(tool = %call.name, "Applying intent");
        effects::apply(effects, intent);
    }

    confirmation.map(DispatchOutcome::handled)
}
