//! OpenAI-compatible text completion client.
//!
//! Works against any provider exposing the `/chat/completions` surface
//! (the default configuration points at Gemini's compatibility endpoint).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Kind-specific completion parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Text completion seam
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run a single-turn completion for the prompt, returning the raw
    /// generated text (markdown for article-style prompts)
    async fn complete(&self, prompt: &str, params: CompletionParams) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint
pub struct ChatCompletionsClient {
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    pub fn new(base_url: String, api_key: &str, model: String) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth_header_value: HeaderValue = format!("Bearer {}", api_key)
            .try_into()
            .map_err(|_| AppError::Config("LLM API key contains invalid characters".into()))?;
        auth_header_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_header_value);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build LLM client: {}", e)))?;

        Ok(Self {
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn complete(&self, prompt: &str, params: CompletionParams) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Generator(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Generator(format!(
                "completion endpoint returned {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Generator(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Generator("no choices in completion response".to_string()))
    }
}
