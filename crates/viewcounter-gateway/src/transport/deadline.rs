//! Request-level timeout.
//!
//! On expiry the in-flight handler future is dropped. Backend primitives are
//! all-or-nothing, so at worst the caller loses the response of a write that
//! did happen.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use viewcounter_core::error::ViewCounterError;

use crate::app_state::AppState;
use crate::transport::response::ApiError;

pub async fn deadline(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let limit = state.request_timeout();
    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(res) => res,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "request deadline exceeded");
            ApiError(ViewCounterError::Timeout).into_response()
        }
    }
}
