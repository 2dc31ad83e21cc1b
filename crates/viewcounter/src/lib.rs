//! Top-level facade crate for viewcounter.
//!
//! Re-exports the storage contract and the gateway library so users can depend on a single crate.

pub mod core {
    pub use viewcounter_core::*;
}

pub mod gateway {
    pub use viewcounter_gateway::*;
}
