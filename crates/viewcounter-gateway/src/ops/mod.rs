//! Operational endpoints and route fallbacks.
//!
//! - `/health` : liveness + active backend id (no backend call)
//! - fallbacks : uniform JSON 404 / 405

use axum::{extract::State, Json};

use viewcounter_core::envelope::Health;
use viewcounter_core::error::ViewCounterError;

use crate::app_state::AppState;
use crate::transport::ApiError;

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health::ok(state.backend_id()))
}

pub async fn not_found() -> ApiError {
    ApiError(ViewCounterError::NotFound)
}

pub async fn method_not_allowed() -> ApiError {
    ApiError(ViewCounterError::MethodNotAllowed)
}
