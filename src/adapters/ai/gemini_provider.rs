//! Gemini Provider - Implementation of AIProvider for Google's Generative Language API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-1.5-flash")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let provider = GeminiProvider::new(config)?;
//! ```
//!
//! A leading system turn is sent as `systemInstruction`; every other turn goes
//! into `contents` with role `user` or `model`. The API key travels in the
//! `x-goog-api-key` header, never in the URL.

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::support::{Prompt, PromptRole};
use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-1.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL. A trailing slash is ignored.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `AIError::Network` if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Converts our request to Gemini's format.
    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        let prompt: &Prompt = &request.prompt;

        let system_instruction = prompt.system_text().map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart::text(text)],
        });

        let contents = prompt
            .history()
            .iter()
            .map(|turn| GeminiContent {
                role: Some(
                    match turn.role {
                        PromptRole::Model => "model",
                        PromptRole::User | PromptRole::System => "user",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart::text(&turn.text)],
            })
            .collect();

        let generation_config = if request.max_tokens.is_some() || request.temperature.is_some() {
            Some(GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            })
        } else {
            None
        };

        GeminiRequest {
            system_instruction,
            contents,
            generation_config,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let body = Self::to_gemini_request(request);

        tracing::debug!(
            trace_id = %request.trace_id,
            model = %self.config.model,
            turns = body.contents.len(),
            "Calling Gemini generateContent"
        );

        self.client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: u32::try_from(self.config.timeout.as_secs())
                            .unwrap_or(u32::MAX),
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses to errors.
    async fn handle_response_status(response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(retry_after)),
            400 => Err(AIError::InvalidRequest(error_body)),
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Extracts the answer text from a decoded response.
    fn extract_text(response: GeminiResponse) -> Result<String, AIError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            return match response.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => Err(AIError::content_filtered(format!(
                    "prompt blocked ({})",
                    reason
                ))),
                None => Err(AIError::parse("No candidates in response")),
            };
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if !text.is_empty() {
            return Ok(text);
        }

        match candidate.finish_reason {
            Some(reason)
                if matches!(reason.as_str(), "SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT") =>
            {
                Err(AIError::content_filtered(format!("finish reason: {}", reason)))
            }
            _ => Err(AIError::parse("Candidate contained no text")),
        }
    }
}

#[async_trait]
impl AIProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(&request).await?;
        let response = Self::handle_response_status(response).await?;

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        let model = gemini_response
            .model_version
            .clone()
            .unwrap_or_else(|| self.config.model.clone());
        let content = Self::extract_text(gemini_response)?;

        Ok(CompletionResponse::new(content, model))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl GeminiPart {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<PromptFeedback>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::support::{
        AgentConfig, Conversation, Message, PromptComposer, PromptTurn, PromptVariant, Role,
    };
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn secret(key: &str) -> Secret<String> {
        Secret::new(key.to_string())
    }

    fn composed(variant: PromptVariant) -> CompletionRequest {
        let agent = AgentConfig::new("Support Agent", "Help with orders.").unwrap();
        let conversation = Conversation::new(vec![
            Message::user("Where is my order?"),
            Message::new(Role::Agent, "Which order?", None),
            Message::user("1234"),
        ]);
        let prompt = PromptComposer::new(variant).compose(&conversation, &agent);
        CompletionRequest::new(prompt, "trace-1")
    }

    /// Serves a fixed status and body on the generateContent route.
    async fn spawn_stub(status: StatusCode, body: Value) -> String {
        let app = Router::new().route(
            "/models/:model",
            post(move |Path(model): Path<String>, headers: HeaderMap| {
                let body = body.clone();
                async move {
                    assert!(model.ends_with(":generateContent"));
                    assert_eq!(headers["x-goog-api-key"], "test-key");
                    (status, Json(body))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider_for(base_url: &str) -> GeminiProvider {
        GeminiProvider::new(GeminiConfig::new(secret("test-key")).with_base_url(base_url)).unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = GeminiConfig::new(secret("test-key"))
            .with_model("gemini-1.5-pro")
            .with_base_url("https://custom.api.com/v1/")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn config_debug_redacts_key() {
        let config = GeminiConfig::new(secret("super-secret"));
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn system_turn_becomes_system_instruction() {
        let body = GeminiProvider::to_gemini_request(&composed(PromptVariant::SystemRole));
        let json = serde_json::to_value(&body).unwrap();

        let system = json["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(system.starts_with("You are Support Agent"));
        assert!(json["systemInstruction"].get("role").is_none());

        let roles: Vec<_> = json["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(json["contents"][2]["parts"][0]["text"], "1234");
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn inline_variant_has_no_system_instruction() {
        let body = GeminiProvider::to_gemini_request(&composed(PromptVariant::Inline));
        let json = serde_json::to_value(&body).unwrap();

        assert!(json.get("systemInstruction").is_none());
        let first = json["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(first.ends_with("User question: Where is my order?"));
    }

    #[test]
    fn generation_config_is_sent_when_tuned() {
        let request = composed(PromptVariant::SystemRole)
            .with_max_tokens(Some(512))
            .with_temperature(Some(0.2));
        let json = serde_json::to_value(GeminiProvider::to_gemini_request(&request)).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 512);
        assert!(json["generationConfig"]["temperature"].as_f64().is_some());
    }

    #[test]
    fn extract_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Your order "}, {"text": "shipped."}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(
            GeminiProvider::extract_text(response).unwrap(),
            "Your order shipped."
        );
    }

    #[test]
    fn extract_text_reports_prompt_block() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert_eq!(
            GeminiProvider::extract_text(response).unwrap_err(),
            AIError::content_filtered("prompt blocked (SAFETY)")
        );
    }

    #[test]
    fn extract_text_reports_safety_finish() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(matches!(
            GeminiProvider::extract_text(response),
            Err(AIError::ContentFiltered { .. })
        ));
    }

    #[test]
    fn extract_text_without_candidates_is_parse_error() {
        let response: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            GeminiProvider::extract_text(response),
            Err(AIError::Parse(_))
        ));
    }

    #[test]
    fn provider_info_reports_model() {
        let provider = provider_for("http://localhost:1");
        let info = provider.provider_info();
        assert_eq!(info.name, "gemini");
        assert_eq!(info.model, "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn complete_returns_candidate_text() {
        let base = spawn_stub(
            StatusCode::OK,
            json!({
                "candidates": [{"content": {"parts": [{"text": "It ships Monday."}]}}],
                "modelVersion": "gemini-1.5-flash-002"
            }),
        )
        .await;

        let response = provider_for(&base)
            .complete(composed(PromptVariant::SystemRole))
            .await
            .unwrap();
        assert_eq!(response.content, "It ships Monday.");
        assert_eq!(response.model, "gemini-1.5-flash-002");
    }

    #[tokio::test]
    async fn complete_maps_error_statuses() {
        let cases = [
            (StatusCode::UNAUTHORIZED, "auth"),
            (StatusCode::TOO_MANY_REQUESTS, "rate"),
            (StatusCode::BAD_REQUEST, "invalid"),
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
        ];

        for (status, label) in cases {
            let base = spawn_stub(status, json!({"error": {"message": label}})).await;
            let err = provider_for(&base)
                .complete(composed(PromptVariant::SystemRole))
                .await
                .unwrap_err();

            match (status.as_u16(), err) {
                (401, AIError::AuthenticationFailed) => {}
                (429, AIError::RateLimited { retry_after_secs }) => {
                    assert_eq!(retry_after_secs, DEFAULT_RETRY_AFTER_SECS)
                }
                (400, AIError::InvalidRequest(body)) => {
                    assert!(body.contains("invalid"))
                }
                (503, AIError::Unavailable { message }) => {
                    assert!(message.contains("503"))
                }
                (status, err) => panic!("unexpected mapping {} -> {:?}", status, err),
            }
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let provider = provider_for("http://127.0.0.1:1");
        let err = provider
            .complete(CompletionRequest::new(
                Prompt::new(vec![PromptTurn::new(PromptRole::User, "hi")]),
                "trace-2",
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AIError::Network(_)));
    }
}
