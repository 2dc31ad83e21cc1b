//! Redis backend.
//!
//! Keys are namespaced under a prefix (`views:` by default). Increments use
//! the native `INCR`, listing walks `SCAN` so large keyspaces never block the
//! server the way `KEYS` would.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::debug;

use viewcounter_core::error::{Result, ViewCounterError};
use viewcounter_core::{Slug, ViewMap, ViewStore};

/// Keys requested per `SCAN` round trip (a hint, not a limit).
const SCAN_COUNT: usize = 500;

/// Redis-backed counter store.
///
/// `ConnectionManager` multiplexes one connection, reconnects on failure and
/// is cheap to clone, so each call clones it instead of locking.
#[derive(Clone)]
pub struct RedisStore {
    con: ConnectionManager,
    prefix: String,
}

impl RedisStore {
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| ViewCounterError::Config(format!("invalid redis url: {e}")))?;
        let con = ConnectionManager::new(client).await.map_err(ViewCounterError::backend)?;
        debug!("Connected to Redis");
        Ok(Self { con, prefix: prefix.into() })
    }

    fn key(&self, slug: &Slug) -> String {
        format!("{}{}", self.prefix, slug)
    }

    async fn scan_keys(&self) -> Result<Vec<String>> {
        let mut con = self.con.clone();
        let pattern = format!("{}*", self.prefix);
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut con)
                .await
                .map_err(ViewCounterError::backend)?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may report a key more than once.
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }
}

#[async_trait]
impl ViewStore for RedisStore {
    fn backend_id(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, slug: &Slug) -> Result<u64> {
        let mut con = self.con.clone();
        let v: Option<u64> = con.get(self.key(slug)).await.map_err(ViewCounterError::backend)?;
        Ok(v.unwrap_or(0))
    }

    async fn set(&self, slug: &Slug, count: u64) -> Result<()> {
        let mut con = self.con.clone();
        con.set::<_, _, ()>(self.key(slug), count)
            .await
            .map_err(ViewCounterError::backend)
    }

    async fn increment(&self, slug: &Slug) -> Result<u64> {
        let mut con = self.con.clone();
        con.incr(self.key(slug), 1u64).await.map_err(ViewCounterError::backend)
    }

    async fn list(&self) -> Result<ViewMap> {
        let keys = self.scan_keys().await?;
        if keys.is_empty() {
            return Ok(ViewMap::new());
        }

        let mut con = self.con.clone();
        let values: Vec<Option<u64>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut con)
            .await
            .map_err(ViewCounterError::backend)?;

        Ok(keys
            .into_iter()
            .zip(values)
            .filter_map(|(key, v)| {
                // A key deleted between SCAN and MGET comes back as nil.
                let count = v?;
                key.strip_prefix(self.prefix.as_str()).map(|slug| (slug.to_owned(), count))
            })
            .collect())
    }
}
