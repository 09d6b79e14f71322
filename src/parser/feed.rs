//! Decoding of remote response bodies into [`RawPayload`]
//!
//! - Sheets v4 `values.get`: `{"range": "...", "values": [["name", "age"], ...]}`
//! - Legacy cell feed: `{"feed": {"entry": [{"title": {"$t": "A1"}, "content": {"$t": "name"}}]}}`

use crate::error::{SyncError, SyncResult};
use crate::types::{CellEntry, RawPayload};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
}

#[derive(Debug, Deserialize)]
struct CellFeed {
    feed: FeedBody,
}

#[derive(Debug, Deserialize)]
struct FeedBody {
    #[serde(default)]
    entry: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    title: FeedText,
    #[serde(default)]
    content: Option<FeedText>,
}

#[derive(Debug, Deserialize)]
struct FeedText {
    #[serde(rename = "$t", default)]
    text: String,
}

/// Decode a Sheets v4 `values.get` response. A missing `values` key is an empty sheet.
pub fn decode_values_response(body: &str) -> SyncResult<RawPayload> {
    let range: ValueRange = serde_json::from_str(body)
        .map_err(|e| SyncError::Parse(format!("invalid values response: {}", e)))?;

    let grid = range
        .values
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(RawPayload::Grid(grid))
}

/// Decode a legacy cell feed (`alt=json`)
pub fn decode_cell_feed(body: &str) -> SyncResult<RawPayload> {
    let feed: CellFeed = serde_json::from_str(body)
        .map_err(|e| SyncError::Parse(format!("invalid cell feed: {}", e)))?;

    let cells = feed
        .feed
        .entry
        .into_iter()
        .map(|entry| CellEntry {
            label: entry.title.text,
            value: entry.content.map(|c| c.text).unwrap_or_default(),
        })
        .collect();

    Ok(RawPayload::Cells(cells))
}

/// Render a JSON cell as the text the sheet displays
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
