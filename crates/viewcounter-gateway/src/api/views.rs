//! Per-slug counter routes.
//!
//! The slug is everything after `/view/`, percent-decoded by the path
//! extractor. Validation happens before the backend is touched.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

use viewcounter_core::envelope::{ViewCount, ViewList};
use viewcounter_core::error::{Result, ViewCounterError};
use viewcounter_core::slug::{Slug, SLUG_REQUIRED};

use crate::app_state::AppState;
use crate::transport::{ApiError, ApiResult};

fn slug_from(path: std::result::Result<Path<String>, PathRejection>) -> Result<Slug> {
    let Path(raw) = path.map_err(|e| ViewCounterError::Validation(e.body_text()))?;
    Slug::new(raw)
}

/// `POST /view/:slug`
pub async fn increment_view(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ViewCount>> {
    let slug = slug_from(path)?;
    let count = state.store().increment(&slug).await?;
    tracing::debug!(%slug, count, "view recorded");
    Ok(Json(ViewCount { slug: slug.into_inner(), count }))
}

/// `GET /view/:slug`
pub async fn get_view(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ViewCount>> {
    let slug = slug_from(path)?;
    let count = state.store().get(&slug).await?;
    Ok(Json(ViewCount { slug: slug.into_inner(), count }))
}

/// `GET|POST /view/` (nothing after the prefix).
pub async fn slug_required() -> ApiError {
    ApiError(ViewCounterError::Validation(SLUG_REQUIRED.into()))
}

/// `GET /views`
pub async fn list_views(State(state): State<AppState>) -> ApiResult<Json<ViewList>> {
    let views = state.store().list().await?;
    Ok(Json(ViewList::from(views)))
}
