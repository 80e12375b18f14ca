//! View filters over an assembled catalog.
//!
//! Filters produce new row vectors; they never remove anything from a
//! persisted snapshot.

use std::collections::HashMap;

use crate::model::CatalogRow;

/// Keep, per `(product_id, dataset_id)` group, only the row(s) carrying the
/// group's maximum version token. Rows without a version are dropped.
///
/// The comparison is lexicographic, which matches chronological order only
/// because the token is a fixed-width zero-padded `YYYYMM` string.
pub fn latest_per_dataset(rows: &[CatalogRow]) -> Vec<CatalogRow> {
    let mut latest: HashMap<(&str, &str), &str> = HashMap::new();

    for row in rows {
        if let Some(version) = row.version.as_deref() {
            latest
                .entry((row.product_id.as_str(), row.dataset_id.as_str()))
                .and_modify(|max| {
                    if version > *max {
                        *max = version;
                    }
                })
                .or_insert(version);
        }
    }

    rows.iter()
        .filter(|row| {
            row.version.as_deref().is_some_and(|version| {
                latest
                    .get(&(row.product_id.as_str(), row.dataset_id.as_str()))
                    .copied()
                    == Some(version)
            })
        })
        .cloned()
        .collect()
}

/// Keep rows with at least one chunked-store asset. Static datasets (no
/// `timeChunked`/`geoChunked` URL) are dropped from the view.
pub fn arco_only(rows: &[CatalogRow]) -> Vec<CatalogRow> {
    rows.iter().filter(|row| row.is_arco()).cloned().collect()
}
