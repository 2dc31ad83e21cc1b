//! viewcounter core: the storage contract, error types, and JSON envelopes.
//!
//! This crate defines what every storage backend must do and what the HTTP
//! API returns. It carries no transport dependency so the gateway, tests,
//! and migration tooling can all share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `ViewCounterError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod envelope;
pub mod error;
pub mod memory;
pub mod migrate;
pub mod slug;
pub mod store;

/// Shared result type.
pub use error::{Result, ViewCounterError};
pub use memory::MemoryStore;
pub use slug::Slug;
pub use store::{ViewMap, ViewStore};
