//! Key-scoped async locks.
//!
//! Used by backends that have no atomic increment primitive: the
//! read-modify-write runs while holding the lock for that key only. Entries
//! are removed as soon as nobody holds or waits on them, so the table stays
//! proportional to the number of in-flight keys.
//!
//! The critical section is per process. Deployments running several
//! instances against the same edge KV namespace can still race.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self { locks: DashMap::new() }
    }

    /// Run `f` while holding the lock for `key`.
    pub async fn with_lock<F, Fut, T>(&self, key: &str, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let lock = Arc::clone(&*self.locks.entry(key.to_owned()).or_default());
        let out = {
            let _guard = lock.lock().await;
            f().await
        };
        drop(lock);

        // Only the table's own handle left: nobody holds or waits on it.
        self.locks.remove_if(key, |_, l| Arc::strong_count(l) == 1);
        out
    }

    /// Number of keys with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn serializes_read_modify_write() {
        let locks = Arc::new(KeyLocks::new());
        let value = Arc::new(AtomicU64::new(0));

        let tasks: Vec<_> = (0..100)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let value = Arc::clone(&value);
                tokio::spawn(async move {
                    locks
                        .with_lock("k", move || async move {
                            // Deliberately split load and store around a yield.
                            let v = value.load(Ordering::SeqCst);
                            tokio::task::yield_now().await;
                            value.store(v + 1, Ordering::SeqCst);
                        })
                        .await
                })
            })
            .collect();

        for t in tasks {
            t.await.unwrap();
        }
        assert_eq!(value.load(Ordering::SeqCst), 100);
        assert!(locks.is_empty());
    }
}
