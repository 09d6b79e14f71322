//! Sync engine: one handle per remote sheet
//!
//! A [`Sheet`] starts unsynced. Every successful [`Sheet::fetch`] replaces its
//! table wholesale; a failed fetch leaves the previous table in place. Inserts
//! and updates always re-fetch first so write addresses are computed against
//! the current remote header and row positions.

pub mod api;

pub use api::{FeedKind, SheetsApi};

use crate::address::CellAddress;
use crate::cache::{CacheKey, CacheManager, CacheStore, FileCacheStore};
use crate::config::SyncOptions;
use crate::error::{SyncError, SyncResult};
use crate::parser::parse_payload;
use crate::query::{self, Condition};
use crate::transport::Transport;
use crate::types::{CellWrite, RawPayload, Row, Table, WriteIntent};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Field → value pairs for inserts and updates
pub type Values = BTreeMap<String, String>;

/// Build [`Values`] from pairs
pub fn values<K, V, I>(pairs: I) -> Values
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Handle on one sheet of one spreadsheet file
pub struct Sheet {
    file_id: String,
    name: String,
    kind: FeedKind,
    worksheet_id: Option<String>,
    api: SheetsApi,
    transport: Arc<dyn Transport>,
    store: Option<Arc<dyn CacheStore>>,
    options: SyncOptions,
    table: Option<Table>,
}

impl Sheet {
    pub fn new(
        file_id: impl Into<String>,
        name: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            name: name.into(),
            kind: FeedKind::default(),
            worksheet_id: None,
            api: SheetsApi::default(),
            transport,
            store: None,
            options: SyncOptions::default(),
            table: None,
        }
    }

    /// Read through a different remote schema
    pub fn with_feed(mut self, kind: FeedKind) -> Self {
        self.kind = kind;
        self
    }

    /// Read through the legacy cell feed of `worksheet_id`; writes still target the sheet name
    pub fn with_worksheet_id(mut self, worksheet_id: impl Into<String>) -> Self {
        self.kind = FeedKind::CellFeed;
        self.worksheet_id = Some(worksheet_id.into());
        self
    }

    pub fn with_api(mut self, api: SheetsApi) -> Self {
        self.api = api;
        self
    }

    /// Use `store` instead of a file store under `cache_dir`
    pub fn with_cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply flat `key = value` options; unknown keys are ignored
    pub fn configure<'a, I>(&mut self, options: I) -> SyncResult<&mut Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.options.apply_all(options)?;
        Ok(self)
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feed(&self) -> FeedKind {
        self.kind
    }

    pub fn worksheet_id(&self) -> Option<&str> {
        self.worksheet_id.as_deref()
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::for_sheet(&self.file_id, &self.name)
    }

    fn cache(&self) -> CacheManager {
        let store = self
            .store
            .clone()
            .unwrap_or_else(|| Arc::new(FileCacheStore::new(&self.options.cache_dir)));
        CacheManager::new(store)
    }

    /// Drop this sheet's cached payload
    pub fn clear_cache(&self) -> SyncResult<()> {
        self.cache().invalidate(&self.cache_key())
    }

    /// Load the sheet from cache or remote and replace the in-memory table.
    ///
    /// `force` bypasses any cached payload. On failure the previous table is kept.
    pub fn fetch(&mut self, force: bool) -> SyncResult<&mut Self> {
        let source = self.worksheet_id.as_deref().unwrap_or(&self.name);
        let request = self.api.read_request(&self.file_id, source, self.kind);
        let kind = self.kind;
        let transport = Arc::clone(&self.transport);

        // Parse inside the loader so an unusable payload is never cached
        let mut loaded = None;
        let payload: RawPayload = self.cache().fetch(
            &self.cache_key(),
            self.options.cache_options(force),
            || {
                let body = transport.send(&request)?;
                let payload = kind.decode(&body)?;
                loaded = Some(parse_payload(&payload)?);
                Ok(payload)
            },
        )?;

        let table = match loaded {
            Some(table) => table,
            None => parse_payload(&payload)?,
        };
        info!(
            sheet = %self.name,
            shape = payload.shape_name(),
            columns = table.header.len(),
            rows = table.row_count(),
            force,
            "sheet synced"
        );
        self.table = Some(table);

        Ok(self)
    }

    pub fn is_synced(&self) -> bool {
        self.table.is_some()
    }

    /// The table from the last successful fetch
    pub fn table(&self) -> SyncResult<&Table> {
        self.table.as_ref().ok_or(SyncError::NotSynced)
    }

    pub fn header(&self) -> SyncResult<&[String]> {
        Ok(&self.table()?.header)
    }

    /// Rows matching `condition`, answered locally
    pub fn select(&self, condition: &Condition) -> SyncResult<Vec<Row>> {
        Ok(query::select(self.table()?, condition))
    }

    /// Append a row built from `values`, aligned to the freshly fetched header.
    ///
    /// Returns the remote acknowledgement.
    pub fn insert(&mut self, values: &Values) -> SyncResult<Value> {
        self.fetch(true)?;
        let intent = self.plan_insert(values)?;
        self.send(&intent)
    }

    /// Set `values` on every row matching `condition`, in one batched request.
    ///
    /// Returns `None` without contacting the remote when nothing would be written.
    pub fn update(&mut self, values: &Values, condition: &Condition) -> SyncResult<Option<Value>> {
        self.fetch(true)?;
        match self.plan_update(values, condition)? {
            Some(intent) => self.send(&intent).map(Some),
            None => {
                debug!(sheet = %self.name, "update matched nothing, no request sent");
                Ok(None)
            }
        }
    }

    /// The append an insert of `values` would send against the current table
    pub fn plan_insert(&self, values: &Values) -> SyncResult<WriteIntent> {
        let table = self.table()?;
        let row = table
            .header
            .iter()
            .map(|field| values.get(field).cloned().unwrap_or_default())
            .collect();

        for field in values.keys().filter(|f| table.column_index(f).is_none()) {
            debug!(field = %field, "dropping field not in header");
        }

        Ok(WriteIntent::Append(row))
    }

    /// The batch update an update would send against the current table
    pub fn plan_update(
        &self,
        values: &Values,
        condition: &Condition,
    ) -> SyncResult<Option<WriteIntent>> {
        let table = self.table()?;
        let matches = query::select(table, condition);

        let mut writes = Vec::new();
        for (field, value) in values {
            let Some(position) = table.column_index(field) else {
                debug!(field = %field, "skipping field not in header");
                continue;
            };
            for row in &matches {
                let address = CellAddress::for_field(&self.name, position, row.origin);
                writes.push(CellWrite {
                    address: address.to_a1()?,
                    value: value.clone(),
                });
            }
        }

        if writes.is_empty() {
            return Ok(None);
        }
        Ok(Some(WriteIntent::BatchUpdate(writes)))
    }

    fn send(&self, intent: &WriteIntent) -> SyncResult<Value> {
        let request = self.api.write_request(&self.file_id, &self.name, intent);
        let body = self.transport.send(&request)?;
        info!(sheet = %self.name, cells = intent.cell_count(), "write sent");
        Ok(acknowledgement(&body))
    }
}

impl std::fmt::Debug for Sheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sheet")
            .field("file_id", &self.file_id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("worksheet_id", &self.worksheet_id)
            .field("options", &self.options)
            .field("synced", &self.table.is_some())
            .finish()
    }
}

/// Remote acknowledgements are opaque; keep them as JSON when possible
fn acknowledgement(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledgement() {
        assert_eq!(acknowledgement(""), Value::Null);
        assert_eq!(
            acknowledgement(r#"{"updatedCells": 1}"#),
            serde_json::json!({"updatedCells": 1})
        );
        assert_eq!(acknowledgement("ok"), Value::String("ok".to_string()));
    }

    #[test]
    fn test_values_helper() {
        let v = values([("b", "2"), ("a", "1")]);
        assert_eq!(v.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
