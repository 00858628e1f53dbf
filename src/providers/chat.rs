use std::time::Duration;

use async_trait::async_trait;
use log::{error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Reasoning block emitted by thinking models before the real answer
static THINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());

/// Client for an OpenAI-compatible chat-completions server
#[derive(Debug)]
pub struct ChatApi {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the server, without the /v1 suffix
    base_url: String,
    /// Model name to request
    model: String,
    /// Completion token limit per request
    max_tokens: u32,
    /// Sampling temperature; the pipeline wants deterministic output
    temperature: f32,
    /// Maximum number of retry attempts for connection failures
    max_retries: u32,
    /// Delay between retry attempts in milliseconds
    retry_delay_ms: u64,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user or assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage { role: "user".to_string(), content: content.into() }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage { role: "system".to_string(), content: content.into() }
    }
}

/// Chat-completions request body
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// Maximum number of tokens to generate
    max_tokens: u32,
    /// Sampling temperature
    temperature: f32,
    /// Whether to stream the response
    stream: bool,
}

/// Builder methods for ChatRequest - API surface for library consumers
#[allow(dead_code)]
impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: 4096,
            temperature: 0.0,
            stream: false,
        }
    }

    /// Set the completion token limit
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Append a message
    pub fn message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }
}

/// Token usage reported by the server
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    /// Number of generated tokens
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    /// Total tokens for the request
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

/// One completion choice in the response
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChatMessage,
    /// Why generation stopped, when the server reports it
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Chat-completions response body
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Completion choices; servers send exactly one for non-streaming requests
    pub choices: Vec<ChatChoice>,
    /// Token usage, when the server reports it
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    /// Content of the first choice, with any reasoning block removed
    pub fn content(&self) -> String {
        let raw = self
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or("");
        THINK_RE.replace_all(raw, "").trim().to_string()
    }
}

impl ChatApi {
    /// Create a new client with default retry settings
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new_with_config(base_url, model, 4096, 5, 5000)
    }

    /// Create a new client with explicit limits and retry settings
    pub fn new_with_config(
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(600))
                .build()
                .unwrap_or_default(),
            base_url,
            model: model.into(),
            max_tokens,
            temperature: 0.0,
            max_retries,
            retry_delay_ms,
        }
    }

    /// Base URL the client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Model name the client requests
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_once(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self.client.post(&url).json(request).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ProviderError::ConnectionError(e.to_string())
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            // Local chat servers answer 400 when the prompt exceeds the
            // model's context window
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "no error body".to_string());
            return Err(ProviderError::ContextOverflow(message));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to get error response text".to_string());
            error!("Chat API error ({}): {}", status, message);
            return Err(ProviderError::ApiError { status_code: status.as_u16(), message });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            let head: String = body.chars().take(500).collect();
            error!("Failed to parse chat response: {}. Raw response (first 500 chars): {}", e, head);
            ProviderError::ParseError(e.to_string())
        })?;

        if parsed.content().is_empty() {
            return Err(ProviderError::EmptyResponse(
                "completion contained no usable text".to_string(),
            ));
        }
        Ok(parsed)
    }
}

#[async_trait]
impl Provider for ChatApi {
    type Request = ChatRequest;
    type Response = ChatResponse;

    fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: false,
        }
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.send_once(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() => {
                    warn!(
                        "Chat API request failed: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }

            attempt += 1;
            if attempt <= self.max_retries {
                tokio::time::sleep(Duration::from_millis(self.retry_delay_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        // llama.cpp-style servers expose /health; OpenAI-compatible ones
        // always answer /v1/models
        let health_url = format!("{}/health", self.base_url);
        if let Ok(response) = self.client.get(&health_url).send().await {
            if response.status().is_success() {
                return Ok(());
            }
        }

        let models_url = format!("{}/v1/models", self.base_url);
        let response = self
            .client
            .get(&models_url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ConnectionError(format!(
                "server answered {} on {}",
                response.status(),
                models_url
            )))
        }
    }

    fn extract_text(response: &ChatResponse) -> String {
        response.content()
    }
}
