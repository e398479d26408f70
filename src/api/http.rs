//! HTTP transport for the CRM REST API.
//!
//! Uses reqwest with optional Bearer token auth. Responses wrapped in the
//! backend's `{"result": ...}` envelope are unwrapped before returning.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use super::{ApiRequest, Method, Transport, API_PREFIX};
use crate::error::DashboardError;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, DashboardError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DashboardError::Config(format!("Invalid API base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::Config(format!(
                "API base URL cannot carry a path: {base_url}"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Build the full URL: base + API prefix + encoded segments + query.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, DashboardError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                DashboardError::Config(format!("API base URL cannot carry a path: {}", self.base_url))
            })?;
            segments.pop_if_empty();
            segments.extend(API_PREFIX.iter());
            segments.extend(request.segments.iter());
        }
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, DashboardError> {
        let url = self.url_for(&request)?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        builder = builder.header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(DashboardError::Api {
                status: status.as_u16(),
                message: api_error_message(&text, status),
            });
        }

        let text = resp.text().await?;
        parse_body(&text)
    }
}

/// Parse a success body. Empty bodies decode to `null`.
pub(crate) fn parse_body(text: &str) -> Result<Value, DashboardError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(text)?;
    Ok(unwrap_envelope(value))
}

fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// The backend reports failures as `{"error": {"message": ...}}`; fall back
/// to the raw body, then to the status reason.
fn api_error_message(text: &str, status: reqwest::StatusCode) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(text) {
        if let Some(message) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
        {
            return message.to_string();
        }
    }
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
