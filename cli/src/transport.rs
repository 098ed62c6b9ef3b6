//! Executes core `HttpRequest` values with reqwest.
//!
//! 4xx/5xx responses come back as data; only failures to complete the
//! round-trip become `ApiError::Transport`.

use std::time::Duration;

use reqwest::{Method, Url};
use rental_core::{ApiError, HttpMethod, HttpRequest, HttpResponse};
use tracing::debug;

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    origin: Url,
}

impl ReqwestTransport {
    /// `origin` is used to resolve relative request paths.
    pub fn new(origin: &str, timeout: Duration) -> Result<Self, ApiError> {
        let origin = Url::parse(origin).map_err(|e| ApiError::Transport(format!("invalid origin {origin}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client, origin })
    }

    /// Absolute URL for `req`.
    pub fn resolve(&self, req: &HttpRequest) -> Result<Url, ApiError> {
        let url = if req.is_relative() {
            self.origin.join(&req.path)
        } else {
            Url::parse(&req.path)
        };
        url.map_err(|e| ApiError::Transport(format!("invalid request url {}: {e}", req.path)))
    }

    pub async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self.resolve(&req)?;
        let method = match req.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };
        debug!(method = req.method.as_str(), %url, "sending request");

        let mut builder = self.client.request(method, url);
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(status, "response received");

        Ok(HttpResponse { status, headers, body })
    }
}
