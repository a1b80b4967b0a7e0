//! Request sender capability used by every provider

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use tracing::debug;

use crate::config::FetcherConfig;
use crate::error::SendError;

/// A single outgoing HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            body: Some(body),
        }
    }
}

/// Performs one HTTP request and returns the raw response body
///
/// Timeouts, TLS and connection reuse are the implementation's concern.
#[async_trait]
pub trait RequestSender: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<Vec<u8>, SendError>;
}

/// [`RequestSender`] backed by a pooled reqwest client
pub struct ReqwestSender {
    client: Client,
}

impl ReqwestSender {
    pub fn new(config: &FetcherConfig) -> Result<Self, SendError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SendError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl RequestSender for ReqwestSender {
    async fn send(&self, request: HttpRequest) -> Result<Vec<u8>, SendError> {
        debug!(method = %request.method, url = %request.url, "Sending provider request");

        let mut builder = self
            .client
            .request(request.method, &request.url)
            .header(header::ACCEPT, "application/json");
        if let Some(body) = request.body {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(SendError::Status(response.status(), request.url));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
