//! Access tokens: where they come from and how long they are reused
//!
//! Credential formats are out of scope; a [`TokenSource`] hands over a bearer
//! token, and a caller-owned [`TokenCache`] keeps it until shortly before expiry.

use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;
use tracing::debug;

/// Tokens this close to expiry are refreshed early
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Default environment variable holding a bearer token
pub const DEFAULT_TOKEN_ENV: &str = "SHEETSYNC_TOKEN";

/// A bearer token with an optional expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    pub fn expiring_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Usable at `now`, leaving the refresh margin
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => now + Duration::seconds(EXPIRY_MARGIN_SECS) < at,
            None => true,
        }
    }
}

/// Acquires a fresh token (OAuth exchange, metadata server, env var, ...)
pub trait TokenSource: Send + Sync {
    fn fetch_token(&self) -> SyncResult<AccessToken>;
}

/// A fixed token
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn fetch_token(&self) -> SyncResult<AccessToken> {
        if self.0.trim().is_empty() {
            return Err(SyncError::Auth("empty access token".to_string()));
        }
        Ok(AccessToken::new(self.0.clone()))
    }
}

/// Reads the token from an environment variable each time it is needed
#[derive(Debug, Clone)]
pub struct EnvToken {
    pub var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_ENV)
    }
}

impl TokenSource for EnvToken {
    fn fetch_token(&self) -> SyncResult<AccessToken> {
        let value = std::env::var(&self.var)
            .map_err(|_| SyncError::Auth(format!("environment variable {} is not set", self.var)))?;
        StaticToken(value).fetch_token()
    }
}

/// Reuses a token from its source until it nears expiry
pub struct TokenCache {
    source: Box<dyn TokenSource>,
    current: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new(source: impl TokenSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            current: Mutex::new(None),
        }
    }

    /// A valid token, fetching a new one when needed
    pub fn token(&self) -> SyncResult<AccessToken> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| SyncError::Auth("token cache lock poisoned".to_string()))?;

        if let Some(token) = current.as_ref() {
            if token.is_valid_at(Utc::now()) {
                return Ok(token.clone());
            }
            debug!("access token expired, refreshing");
        }

        let token = self.source.fetch_token()?;
        *current = Some(token.clone());
        Ok(token)
    }

    /// Forget the cached token (e.g. after the remote rejected it)
    pub fn invalidate(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache").finish_non_exhaustive()
    }
}
