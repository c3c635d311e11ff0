use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};

use crate::decode::decode_body;
use gleaner_core::DirectConfig;

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("redirect limit exceeded: {0}")]
    RedirectLimit(String),
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("network error: {0}")]
    Network(String),
}

impl TransportError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Timeout(_) | TransportError::Network(_))
    }
}

/// Network seam used by the Direct Fetcher: one GET, no retries.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, user_agent: &str) -> Result<RawResponse, TransportError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, url: &str, user_agent: &str) -> Result<RawResponse, TransportError> {
        (**self).get(url, user_agent).await
    }
}

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self::from(&DirectConfig::default())
    }
}

impl From<&DirectConfig> for TransportSettings {
    fn from(config: &DirectConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout,
            request_timeout: config.request_timeout,
            redirect_limit: config.redirect_limit,
            max_bytes: config.max_bytes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    max_bytes: u64,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(Self {
            client,
            max_bytes: settings.max_bytes,
        })
    }

    fn too_large(&self, actual: u64) -> TransportError {
        TransportError::TooLarge {
            max_bytes: self.max_bytes,
            actual: Some(actual),
        }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, user_agent: &str) -> Result<RawResponse, TransportError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|err| TransportError::InvalidUrl(err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .header(USER_AGENT, user_agent)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        // Only 200 and 403 bodies are ever read; a failing status must not
        // turn into a size or stream error.
        if !body_is_used(status) {
            return Ok(RawResponse {
                status,
                final_url,
                content_type,
                body: String::new(),
            });
        }
        if let Some(len) = response.content_length() {
            if len > self.max_bytes {
                return Err(self.too_large(len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_body(&bytes, content_type.as_deref());
        Ok(RawResponse {
            status,
            final_url,
            content_type,
            body: decoded.text,
        })
    }
}

fn body_is_used(status: u16) -> bool {
    matches!(status, 200 | 403)
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(err.to_string());
    }
    if err.is_redirect() {
        return TransportError::RedirectLimit(err.to_string());
    }
    TransportError::Network(err.to_string())
}
