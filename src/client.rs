//! Chat-completion transport.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::prompt::SYSTEM_PROMPT;
use crate::stream::{DecodeOutcome, StreamSink, decode_stream};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// `system` or `user`.
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Chat completion request (OpenAI-compatible).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for a chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: String,
    timeout: Duration,
}

impl ChatClient {
    /// Build a client from API settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no API key is configured. No
    /// network call is made in that case.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let api_key = api
            .api_key()
            .ok_or_else(|| {
                Error::Configuration(
                    "no API key configured; set INFOGEN_API_KEY".to_string(),
                )
            })?
            .to_string();

        // The read timeout bounds idle gaps between chunks, not stream length
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .read_timeout(Duration::from_secs(api.read_timeout_seconds))
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: api.endpoint.clone(),
            model: api.model.clone(),
            temperature: api.temperature,
            api_key,
            timeout: Duration::from_secs(api.timeout_seconds),
        })
    }

    /// Endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request body for a user prompt.
    #[must_use]
    pub fn request_body(&self, prompt: &str, stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.temperature,
            stream,
        }
    }

    /// POST the prompt and return the response if the status is a success.
    async fn send(&self, prompt: &str, stream: bool) -> Result<reqwest::Response> {
        log::debug!(
            "POST {} (model={}, stream={stream})",
            self.endpoint,
            self.model
        );

        let mut request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt, stream));

        // Streams may legitimately outlive a whole-request timeout
        if !stream {
            request = request.timeout(self.timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .and_then(|detail| detail.message);
        Err(Error::from_status(status.as_u16(), message))
    }

    /// Request a complete (non-streamed) reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on HTTP failures and [`Error::Protocol`]
    /// if the body is not a completion or carries no content.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self.send(prompt, false).await?;
        let body = response.bytes().await?;

        let parsed: CompletionResponse = serde_json::from_slice(&body)
            .map_err(|e| Error::Protocol(format!("malformed completion response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::Protocol("no valid response received".to_string()))
    }

    /// Request a streamed reply, forwarding deltas to `sink` as they arrive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on HTTP failures or if reading the body
    /// fails part-way.
    pub async fn stream<S: StreamSink + ?Sized>(
        &self,
        prompt: &str,
        sink: &mut S,
    ) -> Result<DecodeOutcome> {
        let response = self.send(prompt, true).await?;
        decode_stream(response.bytes_stream(), sink).await
    }
}
