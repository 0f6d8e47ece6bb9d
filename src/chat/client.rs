//! Remote exchange with the chat endpoint.
//!
//! One submitted message is one POST. There is no retry or streaming:
//! every failure is reported once and the caller shows the fallback reply.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::{debug, error};

use super::wire::{ChatReply, ChatRequest};
use crate::config::{ChatConfig, ConfigError};

/// Ways a single exchange can fail.
///
/// The user sees the same fallback text for all of them; the variants
/// exist so the log says what actually went wrong.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("Exchange task did not complete: {0}")]
    Interrupted(String),
}

/// Something that can answer a chat request.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ExchangeError>;
}

/// Errors raised while building the HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// `ChatBackend` that POSTs JSON to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpChatClient {
    pub fn new(config: &ChatConfig) -> Result<Self, ClientError> {
        let endpoint = config.endpoint_url()?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ExchangeError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExchangeError::Status { status, body });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Perform one exchange, logging the outcome.
pub async fn run_exchange(
    backend: &dyn ChatBackend,
    request: &ChatRequest,
) -> Result<ChatReply, ExchangeError> {
    debug!(
        chat_len = request.chat.len(),
        history_len = request.history.len(),
        "Sending chat request"
    );

    let outcome = backend.send(request).await;
    match &outcome {
        Ok(reply) => debug!(reply_len = reply.text.len(), "Received chat reply"),
        Err(ExchangeError::Status { status, body }) => {
            error!(%status, %body, "Chat request rejected by server");
        }
        Err(e) => error!("Chat request failed: {}", e),
    }
    outcome
}
