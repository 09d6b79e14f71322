//! Sheetsync - local queries and minimal writes over a remote spreadsheet
//!
//! This library fetches spreadsheet rows into an in-memory table, answers
//! queries against it without remote calls, and turns inserts and updates into
//! the smallest set of remote write requests.
//!
//! # Features
//!
//! - Sheets v4 values API and legacy cell feeds, parsed into one table model
//! - Equality and predicate row queries that keep each row's origin index
//! - Single-request appends and batched cell updates with A1 addressing
//! - Time-bounded file cache with forced refresh
//!
//! # Example
//!
//! ```no_run
//! use sheetsync::client::Client;
//! use sheetsync::query::Condition;
//! use sheetsync::sync::values;
//! use sheetsync::transport::EnvToken;
//! use std::time::Duration;
//!
//! let client = Client::with_token_source(EnvToken::default(), Duration::from_secs(30))?;
//! let mut sheet = client.file("1AbCdEf").sheet("Members");
//! sheet.configure([("cache", "true"), ("cache_expires", "300")])?;
//!
//! let adults = sheet.fetch(false)?.select(&Condition::equals([("status", "active")]))?;
//! println!("Active: {}", adults.len());
//!
//! sheet.update(&values([("status", "inactive")]), &Condition::equals([("name", "Bob")]))?;
//! # Ok::<(), sheetsync::error::SyncError>(())
//! ```

pub mod address;
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod parser;
pub mod query;
pub mod sync;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use error::{SyncError, SyncResult};
pub use query::Condition;
pub use sync::Sheet;
pub use types::{RawPayload, Row, Table, WriteIntent};
