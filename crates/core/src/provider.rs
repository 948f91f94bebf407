//! Provider trait — the abstraction over the generative AI backend.
//!
//! A Provider knows how to send one conversational request to the backend
//! and return the complete response. Responses are never streamed: a partial
//! response that also carries a tool invocation can stall waiting for the
//! invocation's resolution.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;
use crate::message::{Message, Part};
use crate::tool::{ToolDeclaration, ToolInvocation};

/// How the backend may use the advertised tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ToolMode {
    /// The backend decides between a tool call and a text answer
    #[default]
    Auto,
    /// The backend must call one of the tools
    Any,
    /// Tools are advertised but must not be called
    None,
}

/// A single request to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gemini-2.5-flash")
    pub model: String,

    /// System instruction bound to the conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,

    /// Conversation contents, oldest first; the last entry is the new turn
    pub contents: Vec<Message>,

    /// Tools the model may call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDeclaration>,

    /// Tool calling mode
    #[serde(default)]
    pub tool_mode: ToolMode,

    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Ask the backend for a specific output MIME type (e.g. "application/json")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

impl ProviderRequest {
    /// A tool-less single-turn request.
    pub fn single_turn(model: impl Into<String>, message: Message) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            contents: vec![message],
            tools: Vec::new(),
            tool_mode: ToolMode::Auto,
            temperature: None,
            response_mime_type: None,
        }
    }
}

/// A complete response from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The first candidate's content, if the backend returned one
    pub content: Option<Message>,

    /// Structured tool invocations, when the backend surfaces them separately.
    ///
    /// Backends are inconsistent here: some only report invocations as
    /// `Part::FunctionCall` entries inside `content`. Consumers should use
    /// [`ProviderResponse::invocations`] which checks both.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub function_calls: Vec<ToolInvocation>,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    /// Which model actually responded
    pub model: String,
}

impl ProviderResponse {
    /// Tool invocations in response order.
    ///
    /// Uses the structured field when populated, otherwise scans the content
    /// parts for function calls.
    pub fn invocations(&self) -> Vec<ToolInvocation> {
        if !self.function_calls.is_empty() {
            return self.function_calls.clone();
        }
        self.content
            .iter()
            .flat_map(|m| m.parts.iter())
            .filter_map(|p| match p {
                Part::FunctionCall { name, args } => Some(ToolInvocation {
                    name: name.clone(),
                    arguments: args.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Text parts concatenated in order and trimmed. Empty if there is no content.
    pub fn text(&self) -> String {
        self.content.as_ref().map(Message::text).unwrap_or_default()
    }
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The assistant calls `complete()` without knowing which backend is in use.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a request and wait for the complete response.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<ProviderResponse, ProviderError>;
}
