//! Session factory and the stateful chat session.

use std::path::PathBuf;
use std::sync::Arc;

use reelsmith_config::AppConfig;
use reelsmith_core::error::{Error, ProviderError, Result};
use reelsmith_core::message::Message;
use reelsmith_core::provider::{Provider, ProviderRequest, ProviderResponse, ToolMode};
use reelsmith_core::tool::ToolRegistry;
use tracing::{debug, info};

use crate::tools::chat_tools;

/// What every chat session is bound to.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub model: String,
    /// Plain-text system prompt, read once per session
    pub system_prompt_path: PathBuf,
    pub temperature: Option<f32>,
}

impl SessionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            system_prompt_path: config.system_prompt_path.clone(),
            temperature: config.temperature,
        }
    }
}

/// Opens chat sessions against the configured backend.
pub struct SessionFactory {
    provider: Option<Arc<dyn Provider>>,
    settings: SessionSettings,
}

impl SessionFactory {
    /// A factory over an already-built provider; `None` means no credential.
    pub fn new(provider: Option<Arc<dyn Provider>>, settings: SessionSettings) -> Self {
        Self { provider, settings }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = reelsmith_providers::build_from_config(config)?;
        Ok(Self::new(provider, SessionSettings::from_config(config)))
    }

    /// Whether a credential is configured.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Open a new session.
    ///
    /// Returns `Ok(None)` when no credential is configured, without touching
    /// the filesystem. Fails with `Error::ResourceLoad` when the system
    /// prompt cannot be read.
    pub async fn create_session(&self) -> Result<Option<ChatSession>> {
        let Some(provider) = self.provider.clone() else {
            debug!("No backend credential configured; no session created");
            return Ok(None);
        };

        let path = &self.settings.system_prompt_path;
        let system_instruction =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| Error::ResourceLoad {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;

        info!(
            provider = provider.name(),
            model = %self.settings.model,
            prompt = %path.display(),
            "Chat session created"
        );

        Ok(Some(ChatSession {
            provider,
            model: self.settings.model.clone(),
            system_instruction,
            tools: chat_tools().clone(),
            tool_mode: ToolMode::Auto,
            temperature: self.settings.temperature,
            history: Vec::new(),
        }))
    }
}

/// A conversation with the backend.
///
/// Holds the full history so each turn sees the previous ones. `send`
/// borrows the session mutably, so one session runs one turn at a time.
pub struct ChatSession {
    provider: Arc<dyn Provider>,
    model: String,
    system_instruction: String,
    tools: ToolRegistry,
    tool_mode: ToolMode,
    temperature: Option<f32>,
    history: Vec<Message>,
}

impl ChatSession {
    /// Send one user turn and wait for the complete response.
    ///
    /// On success the user turn and the model's content join the history;
    /// on failure the history is left as it was.
    pub async fn send(
        &mut self,
        message: Message,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let mut contents = self.history.clone();
        contents.push(message.clone());

        let request = ProviderRequest {
            model: self.model.clone(),
            system_instruction: Some(self.system_instruction.clone()),
            contents,
            tools: self.tools.declarations().to_vec(),
            tool_mode: self.tool_mode,
            temperature: self.temperature,
            response_mime_type: None,
        };

        debug!(
            model = %self.model,
            history = self.history.len(),
            media = message.has_media(),
            "Sending chat turn"
        );

        let response = self.provider.complete(request).await?;

        self.history.push(message);
        if let Some(content) = &response.content {
            self.history.push(content.clone());
        }
        Ok(response)
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// The tools advertised on every turn of this session.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.tool_mode
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("tools", &self.tools.names())
            .field("tool_mode", &self.tool_mode)
            .field("history", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays canned responses in order and records every request.
    pub struct ScriptedProvider {
        responses: Mutex<Vec<std::result::Result<ProviderResponse, ProviderError>>>,
        pub requests: Mutex<Vec<ProviderRequest>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        pub fn new(responses: Vec<std::result::Result<ProviderResponse, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_request(&self) -> ProviderRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(ProviderError::InvalidResponse("no scripted response left".into()));
            }
            responses.remove(0)
        }
    }

    pub fn text_response(text: &str) -> ProviderResponse {
        ProviderResponse {
            content: Some(Message::model(text)),
            function_calls: Vec::new(),
            usage: None,
            model: "scripted-model".into(),
        }
    }

    pub fn settings(prompt: &std::path::Path) -> SessionSettings {
        SessionSettings {
            model: "gemini-2.5-flash".into(),
            system_prompt_path: prompt.to_path_buf(),
            temperature: None,
        }
    }

    /// A session over `provider` with a throwaway system prompt.
    pub async fn session_with(provider: Arc<ScriptedProvider>) -> ChatSession {
        let dir = tempfile::tempdir().unwrap();
        let prompt = dir.path().join("chat_prompt.txt");
        std::fs::write(&prompt, "You are a movie script assistant.").unwrap();
        SessionFactory::new(Some(provider), settings(&prompt))
            .create_session()
            .await
            .unwrap()
            .unwrap()
    }
}
