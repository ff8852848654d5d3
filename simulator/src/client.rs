use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, StatusCode};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared connection-pooling client, created once per process.
#[derive(Clone)]
pub struct HttpClient {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HttpClient {
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client }
    }

    /// Sends the request and drains the response body, giving up after two
    /// seconds total.
    pub async fn send_recv(&self, request: Request<Full<Bytes>>) -> Result<(StatusCode, Bytes)> {
        tokio::time::timeout(REQUEST_TIMEOUT, self.send_recv_inner(request))
            .await
            .context("Request timed out")?
    }

    async fn send_recv_inner(&self, request: Request<Full<Bytes>>) -> Result<(StatusCode, Bytes)> {
        let resp = self
            .client
            .request(request)
            .await
            .context("Failed to send request")?;
        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .context("Failed to drain response body")?
            .to_bytes();
        Ok((status, body))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
