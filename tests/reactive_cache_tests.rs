//! Integration Tests for the Reactive Cache
//!
//! Drives a `ReactiveCache` against a recording store to check tracking,
//! read preconditions, write ordering and list caching end to end.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{path, ws, RecordingStore};
use dataset_cache::{CacheError, CacheKey, ReactiveCache};
use serde::{Deserialize, Serialize};
use tokio_test::{assert_err, assert_ok};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Widget {
    id: u32,
    label: String,
}

// == Helper Functions ==

fn setup() -> (ReactiveCache, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::new());
    let cache = ReactiveCache::new();
    cache.init(store.clone());
    (cache, store)
}

// == Registry ==

#[test]
fn test_get_before_init_and_after_clear() {
    let cache = ReactiveCache::new();
    assert!(matches!(cache.get(), Err(CacheError::NotInitialized)));

    cache.init(Arc::new(RecordingStore::new()));
    assert_ok!(cache.get());

    cache.clear();
    assert!(matches!(cache.get(), Err(CacheError::NotInitialized)));
}

#[test]
fn test_not_initialized_message_is_actionable() {
    let cache = ReactiveCache::new();
    let err = assert_err!(cache.read::<Widget>(&ws("team"), &path("w")));
    let msg = err.to_string();
    assert!(msg.contains("init"));
    assert!(msg.contains("with_store"));
}

// == Read Path ==

#[test]
fn test_unloaded_read_fails_but_is_tracked() {
    let (cache, _) = setup();

    cache.enable_tracking();
    let err = assert_err!(cache.read::<Widget>(&ws("team"), &path("widgets/1")));
    let deps = cache.disable_tracking();

    assert_eq!(err, CacheError::NotLoaded("team:widgets/1".to_string()));
    assert_eq!(deps, vec![CacheKey::new(&ws("team"), &path("widgets/1"))]);
}

#[test]
fn test_render_pass_dependency_set() {
    let (cache, store) = setup();
    store.seed(&ws("team"), &path("a"), b"1");
    store.seed(&ws("team"), &path("b"), b"2");

    let set = cache.enable_tracking();
    let a: u32 = assert_ok!(cache.read(&ws("team"), &path("a")));
    let b: u32 = assert_ok!(cache.read(&ws("team"), &path("b")));
    let again: u32 = assert_ok!(cache.read(&ws("team"), &path("a")));
    assert_eq!(set.len(), 2);
    let deps = cache.disable_tracking();

    assert_eq!((a, b, again), (1, 2, 1));
    assert_eq!(
        deps,
        vec![
            CacheKey::new(&ws("team"), &path("a")),
            CacheKey::new(&ws("team"), &path("b")),
        ]
    );
    assert!(!cache.is_tracking());
}

#[test]
fn test_reads_outside_window_are_not_tracked() {
    let (cache, store) = setup();
    store.seed(&ws("team"), &path("a"), b"1");

    let _: u32 = assert_ok!(cache.read(&ws("team"), &path("a")));
    cache.enable_tracking();
    assert!(cache.disable_tracking().is_empty());
}

#[test]
fn test_nested_scopes_track_independently() {
    let (cache, store) = setup();
    store.seed(&ws("team"), &path("outer"), b"1");
    store.seed(&ws("team"), &path("inner"), b"2");

    let outer = cache.scope();
    let _: u32 = assert_ok!(cache.read_in(&outer, &ws("team"), &path("outer")));
    {
        let inner = cache.scope();
        let _: u32 = assert_ok!(cache.read_in(&inner, &ws("team"), &path("inner")));
        assert_eq!(
            inner.finish(),
            vec![CacheKey::new(&ws("team"), &path("inner"))]
        );
    }

    assert_eq!(
        outer.finish(),
        vec![CacheKey::new(&ws("team"), &path("outer"))]
    );
}

// == Write Path ==

#[tokio::test]
async fn test_write_roundtrip_through_store() {
    let (cache, _) = setup();
    let widget = Widget {
        id: 7,
        label: "gauge".to_string(),
    };

    let handle = assert_ok!(cache.write(&ws("team"), &path("widgets/7"), &widget));
    assert_ok!(handle.wait().await);

    assert!(assert_ok!(cache.has(&ws("team"), &path("widgets/7"))));
    let stored: Widget = assert_ok!(cache.read(&ws("team"), &path("widgets/7")));
    assert_eq!(stored, widget);
}

#[tokio::test]
async fn test_writes_start_in_submission_order() {
    let (cache, store) = setup();
    let first = CacheKey::new(&ws("team"), &path("slow"));
    store.delay_write(&first, Duration::from_millis(50));

    assert_ok!(cache.write(&ws("team"), &path("slow"), &1u32));
    assert_ok!(cache.write(&ws("team"), &path("fast"), &2u32));
    cache.flush().await;

    assert_eq!(
        store.events(),
        vec![
            "start team:slow",
            "end team:slow",
            "start team:fast",
            "end team:fast",
        ]
    );
}

#[tokio::test]
async fn test_failed_write_does_not_block_later_writes() {
    let (cache, store) = setup();
    store.fail_write(&CacheKey::new(&ws("team"), &path("bad")));

    let bad = assert_ok!(cache.write(&ws("team"), &path("bad"), &1u32));
    let good = assert_ok!(cache.write(&ws("team"), &path("good"), &2u32));

    assert!(matches!(bad.wait().await, Err(CacheError::Store(_))));
    assert_ok!(good.wait().await);

    let stats = cache.stats();
    assert_eq!(stats.writes_failed, 1);
    assert_eq!(stats.writes_completed, 1);
    assert_eq!(cache.pending_writes(), 0);
}

#[tokio::test]
async fn test_fire_and_forget_write_completes() {
    let (cache, store) = setup();

    // Handle dropped immediately
    let _ = cache.write(&ws("team"), &path("quiet"), &"value");
    cache.flush().await;

    assert!(store.events().contains(&"end team:quiet".to_string()));
    let stored: String = assert_ok!(cache.read(&ws("team"), &path("quiet")));
    assert_eq!(stored, "value");
}

// == List Cache ==

#[tokio::test]
async fn test_preload_list_fetches_once() {
    let (cache, store) = setup();
    store.seed(&ws("team"), &path("docs/a"), b"1");
    store.seed(&ws("team"), &path("docs/b"), b"2");

    let first = assert_ok!(cache.preload_list(&ws("team"), &path("docs")).await);
    let second = assert_ok!(cache.preload_list(&ws("team"), &path("docs")).await);

    assert_eq!(first, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(second, first);
    assert_eq!(store.list_calls(), 1);

    assert_eq!(cache.clear_list_cache(), 1);
    assert_ok!(cache.preload_list(&ws("team"), &path("docs")).await);
    assert_eq!(store.list_calls(), 2);
}

#[tokio::test]
async fn test_concurrent_preloads_are_not_deduplicated() {
    let (cache, store) = setup();
    store.seed(&ws("team"), &path("docs/a"), b"1");
    store.delay_lists(Duration::from_millis(20));

    let (workspace, docs) = (ws("team"), path("docs"));
    let (left, right) = tokio::join!(
        cache.preload_list(&workspace, &docs),
        cache.preload_list(&workspace, &docs),
    );

    assert_eq!(assert_ok!(left), assert_ok!(right));
    assert_eq!(store.list_calls(), 2);
}

#[tokio::test]
async fn test_list_accessor_requires_preload() {
    let (cache, store) = setup();
    store.seed(&ws("team"), &path("docs/a"), b"1");

    let err = assert_err!(cache.list(&ws("team"), &path("docs")));
    assert_eq!(err, CacheError::NotLoaded("team:docs".to_string()));

    assert_ok!(cache.preload_list(&ws("team"), &path("docs")).await);
    assert_eq!(
        assert_ok!(cache.list(&ws("team"), &path("docs"))),
        vec!["a".to_string()]
    );

    cache.clear_list_cache();
    assert_err!(cache.list(&ws("team"), &path("docs")));
}
