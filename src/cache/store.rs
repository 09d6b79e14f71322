//! Cache stores: where cached payload bytes live

use super::CacheKey;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Stored bytes plus the time they were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub bytes: Vec<u8>,
    pub timestamp: DateTime<Utc>,
}

/// Byte-blob storage keyed by [`CacheKey`].
///
/// `put` must replace a whole entry atomically; readers never see a partial write.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &CacheKey) -> io::Result<Option<CacheRecord>>;
    fn put(&self, key: &CacheKey, bytes: &[u8]) -> io::Result<()>;
    fn remove(&self, key: &CacheKey) -> io::Result<()>;
}

/// One file per entry under `<dir>/<namespace>/<name>`, timestamped by mtime
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Both key parts are URL-encoded so any sheet name is a safe file name.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir
            .join(urlencoding::encode(&key.namespace).into_owned())
            .join(urlencoding::encode(&key.name).into_owned())
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &CacheKey) -> io::Result<Option<CacheRecord>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let modified = fs::metadata(&path)?.modified()?;

        Ok(Some(CacheRecord {
            bytes,
            timestamp: DateTime::<Utc>::from(modified),
        }))
    }

    fn put(&self, key: &CacheKey, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_for(key);
        let parent = path.parent().unwrap_or(self.dir.as_path());
        fs::create_dir_all(parent)?;

        // Write beside the target, then rename over it
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| e.error)?;

        Ok(())
    }

    fn remove(&self, key: &CacheKey) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// In-process store, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, CacheRecord>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry with an explicit timestamp
    pub fn insert_with_timestamp(
        &self,
        key: &CacheKey,
        bytes: &[u8],
        timestamp: DateTime<Utc>,
    ) -> io::Result<()> {
        self.lock()?.insert(
            key.to_string(),
            CacheRecord {
                bytes: bytes.to_vec(),
                timestamp,
            },
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, CacheRecord>>> {
        self.entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "cache lock poisoned"))
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &CacheKey) -> io::Result<Option<CacheRecord>> {
        Ok(self.lock()?.get(&key.to_string()).cloned())
    }

    fn put(&self, key: &CacheKey, bytes: &[u8]) -> io::Result<()> {
        self.insert_with_timestamp(key, bytes, Utc::now())
    }

    fn remove(&self, key: &CacheKey) -> io::Result<()> {
        self.lock()?.remove(&key.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileCacheStore::new(dir.path());
        let key = CacheKey::for_sheet("file-1", "Sheet 1");

        assert!(store.get(&key).unwrap().is_none());
        store.put(&key, b"payload").unwrap();

        let record = store.get(&key).unwrap().unwrap();
        assert_eq!(record.bytes, b"payload");
        assert!(store.path_for(&key).ends_with("file-1/Sheet%201"));
    }

    #[test]
    fn test_file_store_overwrites_whole_entry() {
        let dir = TempDir::new().unwrap();
        let store = FileCacheStore::new(dir.path());
        let key = CacheKey::for_sheet("f", "s");

        store.put(&key, b"a much longer first payload").unwrap();
        store.put(&key, b"short").unwrap();

        assert_eq!(store.get(&key).unwrap().unwrap().bytes, b"short");
    }

    #[test]
    fn test_file_store_remove_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = FileCacheStore::new(dir.path());
        store.remove(&CacheKey::for_sheet("f", "s")).unwrap();
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCacheStore::new();
        let key = CacheKey::for_url("https://example.com/a");
        store.put(&key, b"x").unwrap();
        assert_eq!(store.len(), 1);
        store.remove(&key).unwrap();
        assert!(store.is_empty());
    }
}
