//! Export / import of full counter snapshots (backend-to-backend migration).
//!
//! Import is intentionally not transactional: entries are written one by one
//! in key order and the first failure aborts the batch, leaving the entries
//! already written in place.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::envelope::ExportDocument;
use crate::error::{Result, ViewCounterError};
use crate::slug::Slug;
use crate::store::ViewStore;

/// Version tag of the export envelope.
pub const EXPORT_FORMAT: &str = "v1";

/// Message returned to clients when the import body has no `data`.
pub const DATA_REQUIRED: &str = "data required";

impl ExportDocument {
    /// Snapshot every counter of `store` into a versioned export envelope.
    pub async fn snapshot(store: &dyn ViewStore) -> Result<Self> {
        let data = store.list().await?;
        Ok(Self {
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            format: EXPORT_FORMAT.into(),
            data,
        })
    }
}

/// Parsed `POST /import` body. Values are validated lazily, entry by entry,
/// while the batch is applied.
#[derive(Debug)]
pub struct ImportBatch {
    entries: Map<String, Value>,
}

impl ImportBatch {
    /// Parse a raw request body.
    ///
    /// Accepts `{ "data": { slug: count, ... } }` and, by extension, a whole
    /// export document. A `format` other than the current one is refused.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut root: Value = serde_json::from_slice(body)
            .map_err(|e| ViewCounterError::Validation(e.to_string()))?;

        if let Some(format) = root.get("format").and_then(Value::as_str) {
            if format != EXPORT_FORMAT {
                return Err(ViewCounterError::Validation(format!(
                    "unsupported export format: {format}"
                )));
            }
        }

        let data = root.as_object_mut().and_then(|o| o.remove("data"));
        match data {
            Some(Value::Object(entries)) => Ok(Self { entries }),
            Some(v) if !is_falsy(&v) => Err(ViewCounterError::Validation(
                "data must be an object mapping slug to count".into(),
            )),
            _ => Err(ViewCounterError::Validation(DATA_REQUIRED.into())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every entry with `set`. Returns the number of entries written.
    pub async fn apply(&self, store: &dyn ViewStore) -> Result<usize> {
        let mut imported = 0usize;
        for (raw_slug, raw_count) in &self.entries {
            let written = async {
                let slug = Slug::new(raw_slug.as_str())?;
                let count = parse_count(&slug, raw_count)?;
                store.set(&slug, count).await
            }
            .await;

            if let Err(e) = written {
                tracing::warn!(
                    imported,
                    remaining = self.entries.len() - imported,
                    slug = %raw_slug,
                    error = %e,
                    "import aborted; earlier entries stay applied"
                );
                return Err(e);
            }
            imported += 1;
        }
        Ok(imported)
    }
}

/// `null`, `false`, `0` and `""` count as an absent `data` field.
fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// A count must be a JSON non-negative integer. Floats, strings and negative
/// numbers are rejected before the store is reached.
pub fn parse_count(slug: &Slug, value: &Value) -> Result<u64> {
    value.as_u64().ok_or_else(|| {
        ViewCounterError::InvalidValue(format!(
            "invalid count for {slug}: {value} (expected a non-negative integer)"
        ))
    })
}

/// Copy every counter from `source` into `target`.
pub async fn migrate(source: &dyn ViewStore, target: &dyn ViewStore) -> Result<usize> {
    let snapshot = source.list().await?;
    let mut copied = 0usize;
    for (raw_slug, count) in snapshot {
        let slug = Slug::new(raw_slug)?;
        target.set(&slug, count).await?;
        copied += 1;
    }
    tracing::info!(
        copied,
        from = source.backend_id(),
        to = target.backend_id(),
        "migration finished"
    );
    Ok(copied)
}
