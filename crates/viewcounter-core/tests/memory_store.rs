//! Storage contract tests against the in-memory backend.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeSet;
use std::sync::Arc;

use viewcounter_core::envelope::ExportDocument;
use viewcounter_core::migrate::{self, ImportBatch, EXPORT_FORMAT};
use viewcounter_core::{MemoryStore, Slug, ViewStore};

fn slug(s: &str) -> Slug {
    Slug::new(s).unwrap()
}

#[tokio::test]
async fn unwritten_key_reads_zero() {
    let store = MemoryStore::new();
    assert_eq!(store.get(&slug("never-seen")).await.unwrap(), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn sequential_increments_accumulate() {
    let store = MemoryStore::new();
    let key = slug("post");
    for n in 1..=25u64 {
        assert_eq!(store.increment(&key).await.unwrap(), n);
    }
    assert_eq!(store.get(&key).await.unwrap(), 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_never_lose_updates() {
    let store = Arc::new(MemoryStore::new());
    let key = slug("hot-post");
    store.set(&key, 10).await.unwrap();

    let tasks: Vec<_> = (0..200)
        .map(|_| {
            let store = Arc::clone(&store);
            let key = key.clone();
            tokio::spawn(async move { store.increment(&key).await.unwrap() })
        })
        .collect();

    let results: Vec<u64> = futures_util::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let unique: BTreeSet<u64> = results.iter().copied().collect();
    assert_eq!(unique.len(), 200, "every increment returns a distinct count");
    assert_eq!(unique.first().copied(), Some(11));
    assert_eq!(unique.last().copied(), Some(210));
    assert_eq!(store.get(&key).await.unwrap(), 210);
}

#[tokio::test]
async fn set_overwrites_and_can_lower_the_count() {
    let store = MemoryStore::new();
    let key = slug("a");
    store.increment(&key).await.unwrap();
    store.increment(&key).await.unwrap();
    store.set(&key, 1).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), 1);
    assert_eq!(store.increment(&key).await.unwrap(), 2);
}

#[tokio::test]
async fn increment_at_max_is_refused_without_wrapping() {
    let store = MemoryStore::new();
    let key = slug("saturated");
    store.set(&key, u64::MAX).await.unwrap();

    let err = store.increment(&key).await.unwrap_err();
    assert_eq!(err.client_code().as_str(), "INVALID_VALUE");
    assert_eq!(store.get(&key).await.unwrap(), u64::MAX);
}

#[tokio::test]
async fn list_contains_written_keys() {
    let store = MemoryStore::new();
    store.set(&slug("pre-existing"), 99).await.unwrap();
    store.set(&slug("a"), 1).await.unwrap();
    store.set(&slug("b"), 2).await.unwrap();

    let all = store.list().await.unwrap();
    assert_eq!(all.get("a"), Some(&1));
    assert_eq!(all.get("b"), Some(&2));
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn keys_are_case_sensitive() {
    let store = MemoryStore::new();
    store.increment(&slug("Post")).await.unwrap();
    assert_eq!(store.get(&slug("post")).await.unwrap(), 0);
}

#[tokio::test]
async fn export_then_import_reproduces_the_snapshot() {
    let source = MemoryStore::new();
    for (k, n) in [("post-a", 3u64), ("post-b", 0), ("ko/글", 12)] {
        source.set(&slug(k), n).await.unwrap();
    }

    let doc = ExportDocument::snapshot(&source).await.unwrap();
    assert_eq!(doc.format, EXPORT_FORMAT);
    assert!(doc.exported_at.ends_with('Z'));

    let body = serde_json::to_vec(&doc).unwrap();
    let target = MemoryStore::new();
    let imported = ImportBatch::parse(&body).unwrap().apply(&target).await.unwrap();

    assert_eq!(imported, 3);
    assert_eq!(target.list().await.unwrap(), source.list().await.unwrap());
}

#[tokio::test]
async fn import_does_not_remove_unlisted_keys() {
    let store = MemoryStore::new();
    store.set(&slug("kept"), 4).await.unwrap();

    let batch = ImportBatch::parse(br#"{"data":{"new":1}}"#).unwrap();
    assert_eq!(batch.len(), 1);
    batch.apply(&store).await.unwrap();

    let all = store.list().await.unwrap();
    assert_eq!(all.get("kept"), Some(&4));
    assert_eq!(all.get("new"), Some(&1));
}

#[tokio::test]
async fn migrate_copies_every_counter() {
    let source = MemoryStore::new();
    let target = MemoryStore::new();
    source.set(&slug("x"), 7).await.unwrap();
    source.set(&slug("y"), 8).await.unwrap();
    target.set(&slug("x"), 1).await.unwrap();

    let copied = migrate::migrate(&source, &target).await.unwrap();
    assert_eq!(copied, 2);
    assert_eq!(target.list().await.unwrap(), source.list().await.unwrap());
}
