//! Google Gemini provider implementation.
//!
//! Implements the `generateContent` API. Auth is via an API key passed in
//! the `x-goog-api-key` header.
//!
//! Supports:
//! - Multi-turn contents with text, inline media, and function call parts
//! - System instructions
//! - Function declarations with AUTO / ANY / NONE calling modes
//! - JSON output mode via `responseMimeType`

use async_trait::async_trait;
use reelsmith_core::error::ProviderError;
use reelsmith_core::message::{Message, Part, Role};
use reelsmith_core::provider::*;
use reelsmith_core::tool::{ToolDeclaration, ToolInvocation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A provider for the Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// `timeout` of `None` means requests wait for as long as the backend takes.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Convert our request into the Gemini wire format.
    fn to_api_request(request: &ProviderRequest) -> ApiRequest {
        let contents = request.contents.iter().map(to_api_content).collect();

        let system_instruction = request.system_instruction.as_ref().map(|text| ApiContent {
            role: None,
            parts: vec![ApiPart::text(text)],
        });

        let (tools, tool_config) = if request.tools.is_empty() {
            (Vec::new(), None)
        } else {
            (
                vec![ApiTool {
                    function_declarations: request.tools.iter().map(to_api_declaration).collect(),
                }],
                Some(ApiToolConfig {
                    function_calling_config: ApiFunctionCallingConfig {
                        mode: request.tool_mode,
                    },
                }),
            )
        };

        let generation_config =
            if request.temperature.is_some() || request.response_mime_type.is_some() {
                Some(ApiGenerationConfig {
                    temperature: request.temperature,
                    response_mime_type: request.response_mime_type.clone(),
                })
            } else {
                None
            };

        ApiRequest {
            contents,
            system_instruction,
            tools,
            tool_config,
            generation_config,
        }
    }

    /// Convert a Gemini response body into our response type.
    fn from_api_response(api: ApiResponse, requested_model: &str) -> ProviderResponse {
        let candidate = api.candidates.into_iter().next();

        if candidate.is_none() {
            warn!(
                block_reason = api
                    .prompt_feedback
                    .as_ref()
                    .and_then(|f| f.block_reason.as_deref())
                    .unwrap_or("none"),
                "Gemini returned no candidates"
            );
        }

        let content = candidate
            .and_then(|c| c.content)
            .map(|c| Message::new(Role::Model, from_api_parts(c.parts)));

        let function_calls: Vec<ToolInvocation> = content
            .iter()
            .flat_map(|m| m.parts.iter())
            .filter_map(|p| match p {
                Part::FunctionCall { name, args } => Some(ToolInvocation::new(name, args.clone())),
                _ => None,
            })
            .collect();

        let usage = api.usage_metadata.map(|u| {
            let prompt = u.prompt_token_count.unwrap_or(0);
            let completion = u.candidates_token_count.unwrap_or(0);
            Usage {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: u.total_token_count.unwrap_or(prompt + completion),
            }
        });

        ProviderResponse {
            content,
            function_calls,
            usage,
            model: api.model_version.unwrap_or_else(|| requested_model.to_string()),
        }
    }
}

#[async_trait]
impl reelsmith_core::Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = self.generate_url(&request.model);
        let body = Self::to_api_request(&request);

        debug!(
            model = %request.model,
            turns = request.contents.len(),
            tools = request.tools.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if !(200..300).contains(&status) {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gemini returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        Ok(Self::from_api_response(api_response, &request.model))
    }
}

// --- Conversion helpers ---

fn to_api_content(message: &Message) -> ApiContent {
    ApiContent {
        role: Some(
            match message.role {
                Role::User => "user",
                Role::Model => "model",
            }
            .into(),
        ),
        parts: message.parts.iter().map(to_api_part).collect(),
    }
}

fn to_api_part(part: &Part) -> ApiPart {
    match part {
        Part::Text { text } => ApiPart::text(text),
        Part::InlineData { mime_type, data } => ApiPart {
            inline_data: Some(ApiBlob {
                mime_type: mime_type.clone(),
                data: data.clone(),
            }),
            ..ApiPart::default()
        },
        Part::FunctionCall { name, args } => ApiPart {
            function_call: Some(ApiFunctionCall {
                name: name.clone(),
                args: args.clone(),
            }),
            ..ApiPart::default()
        },
    }
}

/// Thought summaries are dropped; they are not part of the answer.
fn from_api_parts(parts: Vec<ApiPart>) -> Vec<Part> {
    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        if part.thought == Some(true) {
            continue;
        }
        if let Some(text) = part.text {
            out.push(Part::Text { text });
        }
        if let Some(blob) = part.inline_data {
            out.push(Part::InlineData {
                mime_type: blob.mime_type,
                data: blob.data,
            });
        }
        if let Some(call) = part.function_call {
            out.push(Part::FunctionCall {
                name: call.name,
                args: call.args,
            });
        }
    }
    out
}

fn to_api_declaration(tool: &ToolDeclaration) -> ApiFunctionDeclaration {
    ApiFunctionDeclaration {
        name: tool.name.clone(),
        description: tool.description.clone(),
        parameters: tool.parameters.clone(),
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    contents: Vec<ApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<ApiToolConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<ApiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<ApiBlob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<ApiFunctionCall>,
    #[serde(default, skip_serializing)]
    thought: Option<bool>,
}

impl ApiPart {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiBlob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiTool {
    function_declarations: Vec<ApiFunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct ApiFunctionDeclaration {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiToolConfig {
    function_calling_config: ApiFunctionCallingConfig,
}

#[derive(Debug, Serialize)]
struct ApiFunctionCallingConfig {
    mode: ToolMode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    usage_metadata: Option<ApiUsage>,
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    prompt_feedback: Option<ApiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsage {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_core::Provider;

    fn request_with(contents: Vec<Message>) -> ProviderRequest {
        ProviderRequest {
            model: "gemini-2.5-flash".into(),
            system_instruction: Some("You write movie scripts.".into()),
            contents,
            tools: vec![ToolDeclaration::new(
                "generateYouTubeTitle",
                "Set the title",
                serde_json::json!({"type": "OBJECT", "properties": {"title": {"type": "STRING"}}}),
            )],
            tool_mode: ToolMode::Auto,
            temperature: None,
            response_mime_type: None,
        }
    }

    #[test]
    fn constructor_trims_base_url() {
        let provider = GeminiProvider::new("https://example.test/", "k", None).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(
            provider.generate_url("gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_uses_gemini_wire_names() {
        let msg = Message::new(
            Role::User,
            vec![Part::text("make it moody"), Part::inline_data("image/jpeg", "QUJD")],
        );
        let body = serde_json::to_value(GeminiProvider::to_api_request(&request_with(vec![msg]))).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "make it moody");
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["data"], "QUJD");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You write movie scripts.");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["tools"][0]["functionDeclarations"][0]["name"], "generateYouTubeTitle");
        assert_eq!(body["toolConfig"]["functionCallingConfig"]["mode"], "AUTO");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn request_without_tools_omits_tool_config() {
        let mut req = request_with(vec![Message::user("hi")]);
        req.tools.clear();
        req.response_mime_type = Some("application/json".into());
        let body = serde_json::to_value(GeminiProvider::to_api_request(&req)).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("toolConfig").is_none());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn model_history_keeps_function_calls() {
        let history = vec![
            Message::user("title please"),
            Message::new(
                Role::Model,
                vec![Part::function_call("generateYouTubeTitle", serde_json::json!({"title": "T"}))],
            ),
        ];
        let body = serde_json::to_value(GeminiProvider::to_api_request(&request_with(history))).unwrap();
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][1]["parts"][0]["functionCall"]["args"]["title"], "T");
    }

    #[test]
    fn parse_text_response() {
        let data = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "there"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15},
            "modelVersion": "gemini-2.5-flash"
        }"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let resp = GeminiProvider::from_api_response(api, "requested");
        assert_eq!(resp.text(), "Hello there");
        assert!(resp.function_calls.is_empty());
        assert_eq!(resp.usage.unwrap().total_tokens, 15);
        assert_eq!(resp.model, "gemini-2.5-flash");
    }

    #[test]
    fn parse_function_call_response() {
        let data = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"functionCall": {"name": "translateNarrations", "args": {"targetLanguage": "es", "translatedNarrations": ["hola"]}}},
                    {"functionCall": {"name": "generateYouTubeThumbnail"}}
                ]}
            }]
        }"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let resp = GeminiProvider::from_api_response(api, "requested");
        assert_eq!(resp.function_calls.len(), 2);
        assert_eq!(resp.function_calls[0].name, "translateNarrations");
        assert_eq!(resp.function_calls[0].arguments["targetLanguage"], "es");
        assert!(resp.function_calls[1].arguments.is_null());
        assert_eq!(resp.model, "requested");
    }

    #[test]
    fn thought_parts_are_dropped() {
        let data = r#"{"candidates": [{"content": {"parts": [
            {"text": "let me think", "thought": true},
            {"text": "answer"}
        ]}}]}"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let resp = GeminiProvider::from_api_response(api, "m");
        assert_eq!(resp.text(), "answer");
    }

    #[test]
    fn blocked_prompt_yields_empty_response() {
        let data = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let resp = GeminiProvider::from_api_response(api, "m");
        assert!(resp.content.is_none());
        assert!(resp.text().is_empty());
        assert!(resp.invocations().is_empty());
    }
}
