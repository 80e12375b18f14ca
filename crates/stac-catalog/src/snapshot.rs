//! Persisted catalog snapshot.
//!
//! One JSON document holding the assembled rows plus the generation
//! timestamp. Loaded at startup as the refresh baseline and re-persisted
//! after a refresh. Only the row schema is a contract; the file layout is an
//! implementation detail of this crate.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SnapshotError;
use crate::model::CatalogRow;

/// A materialized catalog as stored on disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<CatalogRow>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    generated_at: DateTime<Utc>,
    rows: &'a [CatalogRow],
}

/// Load a snapshot written by [`save_snapshot`].
pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let body = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&body)?;

    info!(
        path = %path.display(),
        rows = snapshot.rows.len(),
        generated_at = %snapshot.generated_at,
        "Loaded catalog snapshot"
    );

    Ok(snapshot)
}

/// Persist rows atomically: write a sibling temp file, then rename over the
/// destination so readers never observe a half-written snapshot.
pub fn save_snapshot(path: &Path, rows: &[CatalogRow]) -> Result<(), SnapshotError> {
    let document = SnapshotRef {
        generated_at: Utc::now(),
        rows,
    };

    let body = serde_json::to_string_pretty(&document)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;

    info!(path = %path.display(), rows = rows.len(), "Saved catalog snapshot");
    Ok(())
}
