//! Shared application state for the view counter.
//!
//! Holds the one backend handle of the process plus the server settings.
//! Handlers keep no other state between requests.

use std::sync::Arc;
use std::time::Duration;

use viewcounter_core::error::Result;
use viewcounter_core::ViewStore;

use crate::config::{CounterConfig, RouteMode, ServerSection};
use crate::storage;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn ViewStore>,
    server: ServerSection,
}

impl AppState {
    /// Wire an already-built backend. Tests inject `MemoryStore` or fakes here.
    pub fn new(store: Arc<dyn ViewStore>, server: ServerSection) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, server }),
        }
    }

    /// Build state from a validated config, opening the configured backend.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub async fn from_config(cfg: &CounterConfig) -> Result<Self> {
        let store = storage::open_store(&cfg.backend).await?;
        Ok(Self::new(store, cfg.server.clone()))
    }

    pub fn store(&self) -> &dyn ViewStore {
        self.inner.store.as_ref()
    }

    pub fn backend_id(&self) -> &'static str {
        self.inner.store.backend_id()
    }

    pub fn server(&self) -> &ServerSection {
        &self.inner.server
    }

    pub fn route_mode(&self) -> RouteMode {
        self.inner.server.routes
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.inner.server.request_timeout_ms)
    }
}
