//! Storage backends and startup selection.
//!
//! The backend is picked once from config and shared for the life of the
//! process. Secrets are read from the environment variables the config names.

pub mod cloudflare_kv;
pub mod key_lock;
pub mod postgrest;
pub mod redis;

use std::sync::Arc;
use std::time::Duration;

use viewcounter_core::error::{Result, ViewCounterError};
use viewcounter_core::{MemoryStore, ViewStore};

use crate::config::BackendConfig;

pub use cloudflare_kv::{CloudflareKvParams, CloudflareKvStore};
pub use key_lock::KeyLocks;
pub use postgrest::{PostgrestParams, PostgrestStore};
pub use self::redis::RedisStore;

/// Build the configured backend.
pub async fn open_store(cfg: &BackendConfig) -> Result<Arc<dyn ViewStore>> {
    let store: Arc<dyn ViewStore> = match cfg {
        BackendConfig::Memory => {
            tracing::warn!("memory backend selected; counts are lost on restart");
            Arc::new(MemoryStore::new())
        }
        BackendConfig::CloudflareKv { account_id, namespace_id, api_token_env, api_base, timeout_ms } => {
            Arc::new(CloudflareKvStore::new(CloudflareKvParams {
                api_base: api_base.clone(),
                account_id: account_id.clone(),
                namespace_id: namespace_id.clone(),
                api_token: secret_from_env(api_token_env)?,
                timeout: Duration::from_millis(*timeout_ms),
            })?)
        }
        BackendConfig::Redis { url, key_prefix } => {
            Arc::new(RedisStore::connect(url, key_prefix.clone()).await?)
        }
        BackendConfig::Postgrest { url, api_key_env, table, increment_fn, timeout_ms } => {
            Arc::new(PostgrestStore::new(PostgrestParams {
                url: url.clone(),
                api_key: secret_from_env(api_key_env)?,
                table: table.clone(),
                increment_fn: increment_fn.clone(),
                timeout: Duration::from_millis(*timeout_ms),
            })?)
        }
    };

    tracing::info!(backend = store.backend_id(), "storage backend ready");
    Ok(store)
}

fn secret_from_env(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ViewCounterError::Config(format!(
            "environment variable {var} must hold the backend credential"
        ))),
    }
}
