//! HTTP client abstraction for testability

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// Status line of a delivered request; the body is never read
#[derive(Debug, Clone, Copy)]
pub struct HttpResponse {
    pub status: u16,
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &str) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest, restricted to HTTPS
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .https_only(true)
            .build()
            .map_err(|e| crate::WebhookError::Http(format!("Building HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_json(&self, url: &str, body: &str) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| crate::WebhookError::Http(format!("POST {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        tracing::debug!("POST {} -> {}", url, status);
        Ok(HttpResponse { status })
    }
}
