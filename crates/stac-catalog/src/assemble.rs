//! Full catalog assembly: walk every product, flatten items into rows.

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::dsn::AccessMode;
use crate::error::FetchError;
use crate::model::{CatalogRow, ItemRef, WalkWarning};
use crate::stac::StacSource;

/// Per-product progress callback: 1-based index, total product count,
/// product identifier. Purely observational.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize, &str) + Send + Sync);

/// Tuning for a catalog walk.
#[derive(Debug, Clone)]
pub struct AssembleConfig {
    /// Storage scheme used for the rows' derived access strings.
    pub mode: AccessMode,
    /// Bound on concurrent item fetches within one product. Products
    /// themselves are walked sequentially so progress reporting stays
    /// ordered.
    pub concurrency: usize,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            mode: AccessMode::HttpRange,
            concurrency: 4,
        }
    }
}

/// Result of a catalog walk: the flattened rows plus every degraded fetch
/// that was tolerated along the way.
#[derive(Debug, Default)]
pub struct CatalogBuild {
    pub rows: Vec<CatalogRow>,
    pub warnings: Vec<WalkWarning>,
}

/// Walk the catalog and flatten it into one row per dataset-version.
///
/// `product_ids` restricts the walk; `None` walks everything the root
/// catalog lists. A root listing failure propagates, since without the
/// product list nothing else is possible. Per-product and per-item failures
/// degrade to [`WalkWarning`]s and the walk continues; rows with zero assets are
/// retained so static datasets stay visible.
pub async fn assemble_catalog(
    source: &dyn StacSource,
    product_ids: Option<Vec<String>>,
    config: &AssembleConfig,
    progress: Option<ProgressFn<'_>>,
) -> Result<CatalogBuild, FetchError> {
    let products = match product_ids {
        Some(ids) => ids,
        None => source.list_product_ids().await?,
    };

    let total = products.len();
    let mut build = CatalogBuild::default();

    for (index, product_id) in products.iter().enumerate() {
        if let Some(report) = progress {
            report(index + 1, total, product_id);
        }

        let items = match source.list_items(product_id).await {
            Ok(items) => items,
            Err(e) => {
                warn!(product = %product_id, error = %e, "Product listing failed, skipping");
                build.warnings.push(WalkWarning {
                    product_id: product_id.clone(),
                    item_href: None,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        collect_product_rows(source, product_id, items, config, &mut build).await;
    }

    info!(
        rows = build.rows.len(),
        warnings = build.warnings.len(),
        "Catalog assembled"
    );

    Ok(build)
}

/// Fetch a product's items with bounded concurrency and append the results.
///
/// Each item resolves to its own result slot; one item's failure never
/// cancels its siblings.
pub(crate) async fn collect_product_rows(
    source: &dyn StacSource,
    product_id: &str,
    items: Vec<ItemRef>,
    config: &AssembleConfig,
    build: &mut CatalogBuild,
) {
    let fetched = stream::iter(items)
        .map(|item| {
            let href = item.href;
            async move {
                let result = source.fetch_item_assets(product_id, &href).await;
                (href, result)
            }
        })
        .buffer_unordered(config.concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    for (href, result) in fetched {
        match result {
            Ok(assets) => {
                build
                    .rows
                    .push(CatalogRow::from_assets(product_id, assets, config.mode));
            }
            Err(e) => {
                warn!(product = %product_id, item = %href, error = %e, "Item fetch failed, skipping");
                build.warnings.push(WalkWarning {
                    product_id: product_id.to_string(),
                    item_href: Some(href),
                    reason: e.to_string(),
                });
            }
        }
    }
}
