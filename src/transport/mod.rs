//! Transport collaborator: sends one request, returns the raw response body
//!
//! The sync engine only ever talks to [`Transport`]; `HttpTransport` is the
//! production implementation, tests supply their own.

pub mod auth;
pub mod http;

pub use auth::{AccessToken, EnvToken, StaticToken, TokenCache, TokenSource};
pub use http::HttpTransport;

use crate::error::SyncResult;
use std::fmt;

/// HTTP methods the engine needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        };
        write!(f, "{}", name)
    }
}

/// A fully rendered request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// POST with a JSON body
    pub fn post_json(url: impl Into<String>, body: &serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body.to_string()),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Sends a request and returns the response body.
///
/// Non-success responses fail with `SyncError::Transport`; credential failures
/// with `SyncError::Auth`. A call either returns the full body or fails.
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> SyncResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_json_sets_content_type() {
        let request = Request::post_json("https://example.com", &serde_json::json!({"a": 1}));
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body.as_deref(), Some(r#"{"a":1}"#));
        assert!(request
            .headers
            .iter()
            .any(|(k, v)| k == "Content-Type" && v == "application/json"));
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
    }
}
