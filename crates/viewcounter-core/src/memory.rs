//! In-process reference backend.
//!
//! Counters live in a `DashMap`. An increment holds the shard write lock for
//! the duration of the `+1`, which makes it atomic per key without any await
//! point inside the critical section.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Result;
use crate::slug::Slug;
use crate::store::{next_count, ViewMap, ViewStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    counts: DashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { counts: DashMap::new() }
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[async_trait]
impl ViewStore for MemoryStore {
    fn backend_id(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, slug: &Slug) -> Result<u64> {
        Ok(self.counts.get(slug.as_str()).map(|c| *c).unwrap_or(0))
    }

    async fn set(&self, slug: &Slug, count: u64) -> Result<()> {
        self.counts.insert(slug.as_str().to_owned(), count);
        Ok(())
    }

    async fn increment(&self, slug: &Slug) -> Result<u64> {
        let mut count = self.counts.entry(slug.as_str().to_owned()).or_insert(0);
        *count = next_count(slug, *count)?;
        Ok(*count)
    }

    async fn list(&self) -> Result<ViewMap> {
        Ok(self
            .counts
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect())
    }
}
