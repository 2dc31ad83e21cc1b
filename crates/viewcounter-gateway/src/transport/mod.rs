//! Transport layer (HTTP).
//!
//! Middleware applied around every route (tracing, CORS/preflight, request
//! deadline) and the error-to-response mapping used by handlers.

pub mod cors;
pub mod deadline;
pub mod response;
pub mod trace;

pub use response::{ApiError, ApiResult};
