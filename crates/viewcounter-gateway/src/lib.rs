//! viewcounter gateway library entry.
//!
//! This crate wires config, the storage backends, and the HTTP surface into a
//! cohesive service. It is intended to be consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod ops;
pub mod router;
pub mod storage;
pub mod transport;
