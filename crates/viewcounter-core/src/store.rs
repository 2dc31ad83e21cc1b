//! Storage backend contract.
//!
//! Every backend (in-memory, edge KV, Redis, PostgREST) implements the same
//! four operations so the HTTP layer never knows which one is wired in.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::{Result, ViewCounterError};
use crate::slug::Slug;

/// Snapshot of every known counter, keyed by slug.
pub type ViewMap = BTreeMap<String, u64>;

/// Key/count store behind the HTTP API.
///
/// Implementations must be safe for concurrent use: one instance is built at
/// startup and shared by every request.
#[async_trait]
pub trait ViewStore: Send + Sync {
    /// Stable backend identifier reported by `/health`.
    fn backend_id(&self) -> &'static str;

    /// Current count, or `0` for a key that was never written.
    async fn get(&self, slug: &Slug) -> Result<u64>;

    /// Unconditionally overwrite the count. Used by import/migration only.
    async fn set(&self, slug: &Slug, count: u64) -> Result<()>;

    /// Atomically add one and return the new count.
    ///
    /// Concurrent calls on the same key must each observe a distinct result;
    /// a plain get-then-set is not an acceptable implementation.
    async fn increment(&self, slug: &Slug) -> Result<u64>;

    /// Point-in-time snapshot of all counters. No cross-key consistency.
    async fn list(&self) -> Result<ViewMap>;
}

/// Successor of `current` for `increment`. A counter already at `u64::MAX`
/// is refused instead of wrapping; callers must leave the stored value as is.
pub fn next_count(slug: &Slug, current: u64) -> Result<u64> {
    current
        .checked_add(1)
        .ok_or_else(|| ViewCounterError::InvalidValue(format!("count overflow for {slug}")))
}
