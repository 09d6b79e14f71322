//! Entry point: client → spreadsheet file → sheet handles

use crate::cache::CacheStore;
use crate::config::SyncOptions;
use crate::error::SyncResult;
use crate::sync::{FeedKind, Sheet, SheetsApi};
use crate::transport::{HttpTransport, TokenCache, TokenSource, Transport};
use std::sync::Arc;
use std::time::Duration;

/// Shares one transport (and its token cache) across every sheet it opens
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    api: SheetsApi,
    store: Option<Arc<dyn CacheStore>>,
    options: SyncOptions,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            api: SheetsApi::default(),
            store: None,
            options: SyncOptions::default(),
        }
    }

    /// HTTP client authenticating with tokens from `source`
    pub fn with_token_source(
        source: impl TokenSource + 'static,
        timeout: Duration,
    ) -> SyncResult<Self> {
        let tokens = Arc::new(TokenCache::new(source));
        let transport = HttpTransport::new(tokens, timeout)?;
        Ok(Self::new(Arc::new(transport)))
    }

    pub fn with_api(mut self, api: SheetsApi) -> Self {
        self.api = api;
        self
    }

    pub fn with_cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Default options for sheets opened from now on
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Handle on a spreadsheet file by id
    pub fn file(&self, id: impl Into<String>) -> SpreadsheetFile {
        SpreadsheetFile {
            id: id.into(),
            client: self.clone(),
        }
    }
}

/// One spreadsheet file
#[derive(Clone)]
pub struct SpreadsheetFile {
    id: String,
    client: Client,
}

impl SpreadsheetFile {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sheet read through the values API
    pub fn sheet(&self, name: impl Into<String>) -> Sheet {
        self.open(name.into(), FeedKind::Values)
    }

    /// Sheet titled `title`, read through the legacy cell feed of `worksheet_id`.
    ///
    /// Writes and the cache key use the title; only reads use the worksheet id.
    pub fn legacy_sheet(
        &self,
        worksheet_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Sheet {
        self.open(title.into(), FeedKind::Values).with_worksheet_id(worksheet_id)
    }

    fn open(&self, name: String, kind: FeedKind) -> Sheet {
        let sheet = Sheet::new(self.id.clone(), name, Arc::clone(&self.client.transport))
            .with_feed(kind)
            .with_api(self.client.api.clone())
            .with_options(self.client.options.clone());

        match &self.client.store {
            Some(store) => sheet.with_cache_store(Arc::clone(store)),
            None => sheet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Request;
    use crate::SyncError;

    struct Offline;

    impl Transport for Offline {
        fn send(&self, _request: &Request) -> SyncResult<String> {
            Err(SyncError::transport(None, "offline"))
        }
    }

    #[test]
    fn test_file_and_sheet_handles() {
        let options = SyncOptions {
            cache_expires: 5,
            ..SyncOptions::default()
        };
        let client = Client::new(Arc::new(Offline)).with_options(options);
        let file = client.file("1AbC");
        let sheet = file.sheet("Members");
        let legacy = file.legacy_sheet("od6", "Members");

        assert_eq!(file.id(), "1AbC");
        assert_eq!(sheet.file_id(), "1AbC");
        assert_eq!(sheet.name(), "Members");
        assert_eq!(sheet.feed(), FeedKind::Values);
        assert_eq!(sheet.options().cache_expires, 5);
        assert_eq!(legacy.feed(), FeedKind::CellFeed);
        assert_eq!(legacy.name(), "Members");
        assert_eq!(legacy.worksheet_id(), Some("od6"));
        assert_eq!(legacy.cache_key(), sheet.cache_key());
        assert!(!sheet.is_synced());
    }
}
