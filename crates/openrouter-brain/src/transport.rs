//! HTTP seam between the brain and the completions endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use brain_core::BrainError;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::api_types::ChatCompletionRequest;
use crate::config::OpenRouterConfig;

/// Status code and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Build a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure before any HTTP status was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not finish in time.
    #[error("request timed out")]
    Timeout,

    /// Connect, TLS, or body read failure.
    #[error("connection error: {0}")]
    Connection(String),
}

/// Sends one chat-completion request.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// POST the request and return whatever came back.
    async fn send(&self, request: &ChatCompletionRequest) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send(&self, request: &ChatCompletionRequest) -> Result<RawResponse, TransportError> {
        (**self).send(request).await
    }
}

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    client: Client,
    url: String,
    api_key: String,
    http_referer: Option<String>,
    x_title: Option<String>,
}

impl ReqwestTransport {
    /// Create a transport for the configured endpoint.
    pub fn new(config: &OpenRouterConfig) -> Result<Self, BrainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BrainError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            http_referer: config.http_referer.clone(),
            x_title: config.x_title.clone(),
        })
    }
}

#[async_trait]
impl ChatTransport for ReqwestTransport {
    async fn send(&self, request: &ChatCompletionRequest) -> Result<RawResponse, TransportError> {
        debug!("POST {} model={}", self.url, request.model);

        let mut builder = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request);

        if let Some(ref referer) = self.http_referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.x_title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(RawResponse { status, body })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(error.to_string())
    }
}
