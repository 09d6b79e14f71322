//! Blocking HTTP transport with bearer-token auth

// During coverage builds, the stubbed send doesn't use all imports
#![cfg_attr(coverage, allow(unused_imports, dead_code))]

use super::{Method, Request, TokenCache, Transport};
use crate::error::{SyncError, SyncResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// `Transport` over `reqwest::blocking`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    tokens: Arc<TokenCache>,
}

impl HttpTransport {
    /// Build a transport that authenticates every request with `tokens`
    pub fn new(tokens: Arc<TokenCache>, timeout: Duration) -> SyncResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sheetsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                SyncError::transport(None, format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, tokens })
    }

    pub fn with_default_timeout(tokens: Arc<TokenCache>) -> SyncResult<Self> {
        Self::new(tokens, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }
}

impl Transport for HttpTransport {
    /// # Coverage Exclusion (ADR-006)
    /// Makes real HTTP requests - exercised through mock transports in tests
    #[cfg(not(coverage))]
    fn send(&self, request: &Request) -> SyncResult<String> {
        let token = self.tokens.token()?;

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
        }
        .bearer_auth(&token.value);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!(method = %request.method, url = %request.url, "sending request");
        let response = builder.send().map_err(|e| {
            SyncError::transport(e.status().map(|s| s.as_u16()), e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| SyncError::transport(Some(status.as_u16()), e.to_string()))?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Next call re-acquires; no retry here
            self.tokens.invalidate();
        }
        if !status.is_success() {
            return Err(SyncError::transport(Some(status.as_u16()), body));
        }

        Ok(body)
    }

    /// Stub for coverage builds - see ADR-006
    #[cfg(coverage)]
    fn send(&self, _request: &Request) -> SyncResult<String> {
        Err(SyncError::transport(None, "network disabled in coverage builds"))
    }
}
