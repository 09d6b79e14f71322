//! Request rendering for the remote spreadsheet API
//!
//! Reads go through either the Sheets v4 values endpoint or the legacy cell
//! feed; writes always use the v4 `append` and `values:batchUpdate` endpoints.

use crate::error::SyncResult;
use crate::parser::{decode_cell_feed, decode_values_response};
use crate::transport::Request;
use crate::types::{CellWrite, RawPayload, WriteIntent};
use serde_json::json;

/// Sheets API v4 root
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// Legacy spreadsheet feeds root
pub const CELL_FEED_BASE: &str = "https://spreadsheets.google.com/feeds";

/// Writes are interpreted as if typed into the sheet UI
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

/// Which remote schema a sheet is read through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedKind {
    /// Row/column REST (`values.get`), decoded as a grid
    #[default]
    Values,
    /// Legacy cell feed, decoded as labeled cells
    CellFeed,
}

impl FeedKind {
    /// Decode a read response body for this schema
    pub fn decode(self, body: &str) -> SyncResult<RawPayload> {
        match self {
            FeedKind::Values => decode_values_response(body),
            FeedKind::CellFeed => decode_cell_feed(body),
        }
    }
}

/// Endpoint roots; override for proxies and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsApi {
    pub base_url: String,
    pub feed_base_url: String,
}

impl Default for SheetsApi {
    fn default() -> Self {
        Self {
            base_url: SHEETS_API_BASE.to_string(),
            feed_base_url: CELL_FEED_BASE.to_string(),
        }
    }
}

impl SheetsApi {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Read the whole sheet
    pub fn read_request(&self, file_id: &str, sheet: &str, kind: FeedKind) -> Request {
        match kind {
            FeedKind::Values => Request::get(format!(
                "{}/spreadsheets/{}/values/{}",
                self.base_url,
                urlencoding::encode(file_id),
                urlencoding::encode(sheet)
            )),
            FeedKind::CellFeed => Request::get(format!(
                "{}/cells/{}/{}/private/full?alt=json",
                self.feed_base_url,
                urlencoding::encode(file_id),
                urlencoding::encode(sheet)
            )),
        }
    }

    /// Render a write intent as one request
    pub fn write_request(&self, file_id: &str, sheet: &str, intent: &WriteIntent) -> Request {
        match intent {
            WriteIntent::Append(values) => self.append_request(file_id, sheet, values),
            WriteIntent::BatchUpdate(writes) => self.batch_update_request(file_id, writes),
        }
    }

    /// `values.append`: one new row after the last row of the sheet
    pub fn append_request(&self, file_id: &str, sheet: &str, values: &[String]) -> Request {
        let url = format!(
            "{}/spreadsheets/{}/values/{}:append?valueInputOption={}",
            self.base_url,
            urlencoding::encode(file_id),
            urlencoding::encode(sheet),
            VALUE_INPUT_OPTION
        );
        Request::post_json(url, &json!({ "values": [values] }))
    }

    /// `values.batchUpdate`: every cell write in a single request
    pub fn batch_update_request(&self, file_id: &str, writes: &[CellWrite]) -> Request {
        let url = format!(
            "{}/spreadsheets/{}/values:batchUpdate",
            self.base_url,
            urlencoding::encode(file_id)
        );
        let data: Vec<_> = writes
            .iter()
            .map(|w| json!({ "range": w.address, "values": [[w.value]] }))
            .collect();

        Request::post_json(
            url,
            &json!({ "valueInputOption": VALUE_INPUT_OPTION, "data": data }),
        )
    }
}
