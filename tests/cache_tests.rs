//! Cache manager tests over the file store

use chrono::{Duration, Utc};
use sheetsync::cache::{
    CacheKey, CacheManager, CacheOptions, CacheStore, FileCacheStore, MemoryCacheStore,
};
use sheetsync::types::RawPayload;
use sheetsync::SyncError;
use std::cell::Cell;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn options(window: u64) -> CacheOptions {
    CacheOptions {
        enabled: true,
        freshness_window_secs: window,
        force_refresh: false,
    }
}

fn grid() -> RawPayload {
    RawPayload::Grid(vec![vec!["name".to_string()], vec!["Alice".to_string()]])
}

#[test]
fn test_put_then_get_within_window() {
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::new(Arc::new(FileCacheStore::new(dir.path())));
    let key = CacheKey::for_sheet("file-1", "Members");
    let loads = Cell::new(0);

    for _ in 0..3 {
        let payload: RawPayload = cache
            .fetch(&key, options(600), || {
                loads.set(loads.get() + 1);
                Ok(grid())
            })
            .unwrap();
        assert_eq!(payload, grid());
    }

    assert_eq!(loads.get(), 1);
    assert!(cache.is_fresh(&key, options(600)));
}

#[test]
fn test_zero_window_is_always_stale() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileCacheStore::new(dir.path()));
    let cache = CacheManager::new(store.clone());
    let key = CacheKey::for_sheet("file-1", "Members");
    let loads = Cell::new(0);

    for _ in 0..2 {
        let _: RawPayload = cache
            .fetch(&key, options(0), || {
                loads.set(loads.get() + 1);
                Ok(grid())
            })
            .unwrap();
    }

    assert_eq!(loads.get(), 2);
    // Still stored, just not usable
    assert!(store.get(&key).unwrap().is_some());
}

#[test]
fn test_elapsed_window_is_a_miss_even_though_stored() {
    let store = Arc::new(MemoryCacheStore::new());
    let key = CacheKey::for_sheet("file-1", "Members");
    let bytes = serde_json::to_vec(&grid()).unwrap();
    let cache = CacheManager::new(store.clone());

    store
        .insert_with_timestamp(&key, &bytes, Utc::now() - Duration::seconds(30))
        .unwrap();
    assert!(cache.is_fresh(&key, options(60)));

    store
        .insert_with_timestamp(&key, &bytes, Utc::now() - Duration::seconds(90))
        .unwrap();
    assert!(!cache.is_fresh(&key, options(60)));
    assert!(store.get(&key).unwrap().is_some());
}

#[test]
fn test_corrupt_file_degrades_to_miss() {
    let dir = TempDir::new().unwrap();
    let store = FileCacheStore::new(dir.path());
    let key = CacheKey::for_sheet("file-1", "Members");
    let path = store.path_for(&key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"\x00\x01 truncated").unwrap();

    let cache = CacheManager::new(Arc::new(store));
    let payload: RawPayload = cache.fetch(&key, options(600), || Ok(grid())).unwrap();

    assert_eq!(payload, grid());
    // Replaced by the fresh payload
    let restored: RawPayload = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(restored, grid());
}

#[test]
fn test_loader_error_does_not_create_entry() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileCacheStore::new(dir.path()));
    let cache = CacheManager::new(store.clone());
    let key = CacheKey::for_sheet("file-1", "Members");

    let result: Result<RawPayload, _> =
        cache.fetch(&key, options(600), || Err(SyncError::Auth("no token".to_string())));

    assert!(matches!(result, Err(SyncError::Auth(_))));
    assert!(!store.path_for(&key).exists());
}

#[test]
fn test_invalidate_removes_entry() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileCacheStore::new(dir.path()));
    let cache = CacheManager::new(store.clone());
    let key = CacheKey::for_sheet("file-1", "Members");

    let _: RawPayload = cache.fetch(&key, options(600), || Ok(grid())).unwrap();
    cache.invalidate(&key).unwrap();

    assert!(!cache.is_fresh(&key, options(600)));
}
