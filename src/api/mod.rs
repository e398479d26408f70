//! Remote data client for the advisor CRM backend.
//!
//! Modules:
//! - client: one async function per resource/operation
//! - http: reqwest transport against the CRM REST API
//!
//! Every operation is fire-once: no retry, pagination, caching or
//! cancellation. Failures surface as transport-kind `DashboardError`s.

pub mod client;
pub mod http;
#[cfg(test)]
pub(crate) mod stub;

pub use client::AdvisorClient;
pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DashboardError;
use crate::types::Filters;

/// Path prefix shared by every advisor endpoint.
pub const API_PREFIX: &[&str] = &["api", "advisor"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// A single backend call, independent of how it is carried.
///
/// `segments` are raw (unencoded) path segments below `API_PREFIX`; the
/// transport is responsible for encoding them.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: Method::Get,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: Method::Post,
            ..Self::get(segments)
        }
    }

    /// Render filters as query parameters. String values are sent as-is,
    /// everything else as its JSON text. Null values are dropped.
    pub fn with_filters(mut self, filters: &Filters) -> Self {
        for (key, value) in filters {
            let rendered = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            self.query.push((key.clone(), rendered));
        }
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// "GET compliance/customers/C-1/documents", used for logging and stubs.
    pub fn route(&self) -> String {
        format!("{} {}", self.method, self.segments.join("/"))
    }
}

/// Carrier for `ApiRequest`s. Implemented over HTTP in production.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<Value, DashboardError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filters_render_as_query_pairs() {
        let mut filters = Filters::new();
        filters.insert("stage".into(), json!("retirement"));
        filters.insert("minAge".into(), json!(55));
        filters.insert("active".into(), json!(true));
        filters.insert("ignored".into(), Value::Null);

        let request = ApiRequest::get(["intelligence", "milestones"]).with_filters(&filters);

        // BTreeMap ordering
        assert_eq!(
            request.query,
            vec![
                ("active".to_string(), "true".to_string()),
                ("minAge".to_string(), "55".to_string()),
                ("stage".to_string(), "retirement".to_string()),
            ]
        );
        assert_eq!(request.route(), "GET intelligence/milestones");
    }

    #[test]
    fn test_post_keeps_segments() {
        let request = ApiRequest::post(["compliance", "disclosures"])
            .with_body(json!({ "transactionType": "annuity" }));
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.route(), "POST compliance/disclosures");
        assert!(request.body.is_some());
    }
}
