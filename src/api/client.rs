//! HTTP client for the skilins REST API
//!
//! Thin wrapper over reqwest: joins resource paths onto the configured base
//! URL, forwards the session cookie, and maps every failure to `ApiError`
//! with the server's message preserved.

use reqwest::header;
use serde_json::Value;

use super::common::relative_to;
use super::error::ApiError;
use super::request::{Body, Method, WriteRequest};
use crate::config::ApiConfig;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cookie: Option<String>,
}

impl ApiClient {
    /// Create a client for the configured API
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie: None,
        })
    }

    /// Forward `cookie` as the `Cookie` header on every request
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a resource path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, relative_to(&self.base_url, path))
    }

    /// GET a resource and return its raw JSON body
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let request = self.authorize(self.http.get(&url));
        let response = request.send().await?;
        read_body(response).await
    }

    /// Perform a write and return the raw JSON body of the response
    pub async fn send(&self, write: &WriteRequest) -> Result<Value, ApiError> {
        let url = self.url(&write.path);
        tracing::debug!("{} {}", write.method, url);

        let builder = match write.method {
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Patch => self.http.patch(&url),
            Method::Delete => self.http.delete(&url),
        };

        let builder = match &write.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Multipart(payload) => builder.multipart(payload.to_form()?),
        };

        let response = self.authorize(builder).send().await?;
        read_body(response).await
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }
}

/// Read a response body as JSON, turning non-success statuses into errors.
/// Bodies that are not JSON are kept as a JSON string.
async fn read_body(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    if status.is_success() {
        Ok(body)
    } else {
        Err(ApiError::from_body(status.as_u16(), &body))
    }
}
