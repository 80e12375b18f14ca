//! Incremental catalog refresh against a previously materialized snapshot.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::assemble::{
    assemble_catalog, collect_product_rows, AssembleConfig, CatalogBuild, ProgressFn,
};
use crate::error::FetchError;
use crate::model::{CatalogRow, ItemRef, WalkWarning};
use crate::stac::StacSource;

/// Result of a refresh: the full row set to persist, how many rows are new,
/// and the warnings of whatever walking was needed.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub rows: Vec<CatalogRow>,
    /// Zero means the cache was already up to date and is returned unchanged.
    pub new_count: usize,
    pub warnings: Vec<WalkWarning>,
}

/// Reconcile a cached catalog with the upstream tree.
///
/// The upstream catalog is append-mostly, so the expensive item+asset pass
/// only runs for identifiers the cache does not know: a cheap id-only
/// enumeration (product + item listings, no asset fetches) decides what is
/// new. Cached rows are never re-fetched, overwritten, or deleted.
pub async fn refresh_catalog(
    source: &dyn StacSource,
    cached: Vec<CatalogRow>,
    force_full: bool,
    config: &AssembleConfig,
    progress: Option<ProgressFn<'_>>,
) -> Result<RefreshOutcome, FetchError> {
    if force_full {
        let build = assemble_catalog(source, None, config, progress).await?;
        let new_count = build.rows.len();
        return Ok(RefreshOutcome {
            rows: build.rows,
            new_count,
            warnings: build.warnings,
        });
    }

    let products = source.list_product_ids().await?;

    let mut warnings = Vec::new();
    let mut pending: Vec<(String, Vec<ItemRef>)> = Vec::new();

    {
        let known: HashSet<(&str, &str)> = cached
            .iter()
            .map(|row| (row.product_id.as_str(), row.dataset_version_id.as_str()))
            .collect();

        for product_id in products {
            let items = match source.list_items(&product_id).await {
                Ok(items) => items,
                Err(e) => {
                    warn!(product = %product_id, error = %e, "Product listing failed, skipping");
                    warnings.push(WalkWarning {
                        product_id: product_id.clone(),
                        item_href: None,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let fresh: Vec<ItemRef> = items
                .into_iter()
                .filter(|item| {
                    !known.contains(&(product_id.as_str(), item.dataset_version_id()))
                })
                .collect();

            if !fresh.is_empty() {
                pending.push((product_id, fresh));
            }
        }
    }

    if pending.is_empty() {
        info!(rows = cached.len(), "Catalog is up to date");
        return Ok(RefreshOutcome {
            rows: cached,
            new_count: 0,
            warnings,
        });
    }

    let total = pending.len();
    let mut build = CatalogBuild::default();

    for (index, (product_id, items)) in pending.into_iter().enumerate() {
        if let Some(report) = progress {
            report(index + 1, total, &product_id);
        }

        collect_product_rows(source, &product_id, items, config, &mut build).await;
    }

    let new_count = build.rows.len();
    info!(
        cached = cached.len(),
        new = new_count,
        "Catalog refreshed incrementally"
    );

    let mut rows = cached;
    rows.extend(build.rows);
    warnings.extend(build.warnings);

    Ok(RefreshOutcome {
        rows,
        new_count,
        warnings,
    })
}
