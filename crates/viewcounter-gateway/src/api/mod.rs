//! Counter API handlers.

pub mod migrate;
pub mod views;
