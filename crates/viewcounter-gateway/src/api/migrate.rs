//! Export / import routes used to move counts between backends.

use axum::{extract::State, Json};
use bytes::Bytes;

use viewcounter_core::envelope::{ExportDocument, ImportSummary};
use viewcounter_core::migrate::ImportBatch;

use crate::app_state::AppState;
use crate::transport::ApiResult;

/// `GET /export`
pub async fn export(State(state): State<AppState>) -> ApiResult<Json<ExportDocument>> {
    let doc = ExportDocument::snapshot(state.store()).await?;
    tracing::info!(keys = doc.data.len(), "export served");
    Ok(Json(doc))
}

/// `POST /import`
///
/// Not transactional: a failing entry aborts the rest of the batch and the
/// entries already written stay written.
pub async fn import(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<ImportSummary>> {
    let batch = ImportBatch::parse(&body)?;
    let imported = batch.apply(state.store()).await?;
    tracing::info!(imported, backend = state.backend_id(), "import applied");
    Ok(Json(ImportSummary { imported, success: true }))
}
