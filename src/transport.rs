//! HTTP transport seam.
//!
//! The request pipeline talks to the network through [`HttpTransport`], so
//! tests (and callers with their own connection pooling, timeouts, or
//! proxies) can inject a different implementation. The crate sets no
//! timeout of its own; bound latency by configuring the underlying
//! [`reqwest::Client`].

use async_trait::async_trait;

use crate::error::NameSiloError;

/// Raw HTTP reply handed back from a transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// One HTTP GET, no retries.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, NameSiloError>;
}

/// Default transport backed by a [`reqwest::Client`].
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Wrap an already-configured client (timeouts, proxy, pool limits).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, NameSiloError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NameSiloError::Http(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| NameSiloError::Http(e.to_string()))?
            .to_vec();
        Ok(HttpResponse { status, body })
    }
}
