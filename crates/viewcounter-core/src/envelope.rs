//! JSON response envelopes.
//!
//! Shapes are identical whichever backend is active. Field names follow the
//! public API (`exportedAt` is camelCase on the wire).

use serde::{Deserialize, Serialize};

use crate::store::ViewMap;

/// `GET|POST /view/:slug`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCount {
    pub slug: String,
    pub count: u64,
}

/// `GET /views`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewList {
    pub views: ViewMap,
    pub total: usize,
}

impl From<ViewMap> for ViewList {
    fn from(views: ViewMap) -> Self {
        let total = views.len();
        Self { views, total }
    }
}

/// `GET /export` (also accepted as-is by `POST /import`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub exported_at: String,
    pub format: String,
    pub data: ViewMap,
}

/// `POST /import`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub success: bool,
}

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub backend: String,
}

impl Health {
    pub fn ok(backend: &str) -> Self {
        Self { status: "ok".into(), backend: backend.into() }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
