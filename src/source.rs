use crate::errors::CollectorError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Where exposition text comes from. Every call is a fresh read.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// identifies the source in logs and errors
    fn endpoint(&self) -> &str;

    async fn fetch(&self) -> Result<String, CollectorError>;
}

/// Node exporter `/metrics` endpoint over HTTP. One attempt per fetch, no retry.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, CollectorError> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CollectorError::FetchError {
                endpoint: url.clone(),
                source: e,
            })?;
        Ok(Self {
            client,
            url,
            timeout,
        })
    }

    fn map_transport(&self, e: reqwest::Error) -> CollectorError {
        if e.is_timeout() {
            CollectorError::Timeout {
                endpoint: self.url.clone(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            CollectorError::FetchError {
                endpoint: self.url.clone(),
                source: e,
            }
        }
    }
}

#[async_trait]
impl MetricsSource for HttpSource {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<String, CollectorError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::BadStatus {
                endpoint: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.map_transport(e))?;
        debug!(endpoint = %self.url, bytes = body.len(), "fetched exposition");
        Ok(body)
    }
}
