use super::messages::{ChatTurn, CompletionRequest, CompletionResponse, ErrorResponse};
use crate::error::CompletionError;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, error};

/// Reply used when the endpoint answers with an empty `content`
pub const EMPTY_REPLY: &str = "I understand. Please continue.";

/// Chat completion capability consumed by a voice call
///
/// Implementations receive the full ordered turn list on every call and
/// return the assistant's reply text.
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, CompletionError>;
}

/// Completion service backed by the `/api/chat` HTTP endpoint
pub struct HttpCompletionClient {
    endpoint: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl HttpCompletionClient {
    /// `timeout` bounds each request; `None` leaves requests unbounded
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            endpoint: endpoint.into(),
            timeout,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_error(&self, e: reqwest::Error) -> CompletionError {
        match self.timeout {
            Some(limit) if e.is_timeout() => CompletionError::Timeout(limit),
            _ => CompletionError::Transport(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl CompletionService for HttpCompletionClient {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, CompletionError> {
        let body = CompletionRequest {
            messages: turns.to_vec(),
        };

        debug!("Posting {} turns to {}", turns.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        debug!("Chat endpoint responded with {}", status);

        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Chat endpoint error: {} - {}", status.as_u16(), message);
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply: CompletionResponse = response
            .json()
            .await
            .map_err(|e| match self.request_error(e) {
                CompletionError::Transport(message) => CompletionError::Malformed(message),
                other => other,
            })?;

        if reply.content.trim().is_empty() {
            return Ok(EMPTY_REPLY.to_string());
        }

        Ok(reply.content)
    }
}
