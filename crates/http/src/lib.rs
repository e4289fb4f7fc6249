//! reqwest implementation of [`AdminTransport`].
//!
//! `HttpTransport` performs the actual HTTP exchanges against each host's
//! admin API and translates reqwest failures into the domain
//! `TransportError` taxonomy.

use shardadm_admin::AdminTransport;
use shardadm_common::{HostStatus, TransportError};
use std::time::Duration;

/// An HTTP-based admin transport.
///
/// Wraps a single `reqwest::Client`, which pools and reuses connections
/// across hosts internally.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with reqwest's default settings (no overall
    /// request deadline).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a transport with a per-request deadline.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Connect(format!("client build failed: {}", e)))?;
        Ok(Self { client })
    }

    async fn exchange(
        &self,
        method: reqwest::Method,
        base: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<HostStatus, TransportError> {
        let m = shardadm_metrics::metrics();
        let label = if method == reqwest::Method::GET {
            "get"
        } else {
            "post"
        };
        m.requests_sent.with_label_values(&[label]).inc();

        let url = format!("{}{}", base.trim_end_matches('/'), path);
        let result = self.send(method, &url, query).await;
        if result.is_err() {
            m.requests_failed.with_label_values(&[label]).inc();
        }
        result
    }

    async fn send(
        &self,
        method: reqwest::Method,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<HostStatus, TransportError> {
        let mut request = self.client.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(map_transport_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<HostStatus>()
            .await
            .map_err(map_transport_err)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn map_transport_err(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_decode() {
        TransportError::Deserialize(e.to_string())
    } else {
        TransportError::Connect(e.to_string())
    }
}

#[async_trait::async_trait]
impl AdminTransport for HttpTransport {
    async fn get(
        &self,
        base: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<HostStatus, TransportError> {
        self.exchange(reqwest::Method::GET, base, path, query).await
    }

    async fn post(
        &self,
        base: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<HostStatus, TransportError> {
        self.exchange(reqwest::Method::POST, base, path, query)
            .await
    }
}
