//! Catalog row model and identifier handling.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dsn::{self, AccessMode};

/// One row of the assembled catalog: a single dataset-version of a product.
///
/// Asset URL columns are `None` for static (non-chunked) datasets. The
/// derived `*_dsn` / `*_uri` columns are pure functions of their URL column,
/// computed once at construction and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub product_id: String,
    pub dataset_version_id: String,
    pub dataset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_chunked_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_chunked_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_chunked_dsn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_chunked_dsn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_dsn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_chunked_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_chunked_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_uri: Option<String>,
}

impl CatalogRow {
    /// Build a row from a fetched asset set, deriving the identifier split
    /// and all access-string columns.
    pub fn from_assets(product_id: &str, assets: AssetSet, mode: AccessMode) -> Self {
        let (dataset_id, version) = split_dataset_version(&assets.dataset_version_id);

        let (time_chunked_dsn, time_chunked_uri) =
            derive_columns(&assets.dataset_version_id, assets.time_chunked.as_deref(), mode);
        let (geo_chunked_dsn, geo_chunked_uri) =
            derive_columns(&assets.dataset_version_id, assets.geo_chunked.as_deref(), mode);
        let (native_dsn, native_uri) =
            derive_columns(&assets.dataset_version_id, assets.native.as_deref(), mode);

        Self {
            product_id: product_id.to_string(),
            dataset_version_id: assets.dataset_version_id,
            dataset_id,
            version,
            time_chunked_url: assets.time_chunked,
            geo_chunked_url: assets.geo_chunked,
            native_url: assets.native,
            time_chunked_dsn,
            geo_chunked_dsn,
            native_dsn,
            time_chunked_uri,
            geo_chunked_uri,
            native_uri,
        }
    }

    /// Whether any chunked-store asset is present (the ARCO predicate).
    pub fn is_arco(&self) -> bool {
        self.time_chunked_url.is_some() || self.geo_chunked_url.is_some()
    }
}

/// Derive the DSN and object-URI columns for one asset URL.
///
/// Each column is attempted independently: a URL the rewriters reject leaves
/// that column `None` without affecting the row's other columns.
fn derive_columns(
    dataset_version_id: &str,
    url: Option<&str>,
    mode: AccessMode,
) -> (Option<String>, Option<String>) {
    let Some(url) = url else {
        return (None, None);
    };

    let access = match dsn::to_access_string(url, mode, None) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(dataset = %dataset_version_id, url = %url, error = %e, "Unusable asset URL for access string");
            None
        }
    };

    let uri = match dsn::to_object_uri(url) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(dataset = %dataset_version_id, url = %url, error = %e, "Unusable asset URL for object URI");
            None
        }
    };

    (access, uri)
}

/// Split a dataset-version identifier into the dataset identifier and the
/// trailing version token.
///
/// The token rule is a trailing underscore plus exactly six ASCII digits
/// (commonly `YYYYMM`); anything else leaves the identifier intact with no
/// version. `{dataset_id}_{version}` reconstructs the input whenever a
/// version is returned.
pub fn split_dataset_version(dataset_version_id: &str) -> (String, Option<String>) {
    if let Some((stem, tail)) = dataset_version_id.rsplit_once('_') {
        if tail.len() == 6 && tail.bytes().all(|b| b.is_ascii_digit()) {
            return (stem.to_string(), Some(tail.to_string()));
        }
    }

    (dataset_version_id.to_string(), None)
}

/// A product's link to one dataset-version item, before the item itself has
/// been fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRef {
    /// Item document location relative to the product directory.
    pub href: String,
    pub title: Option<String>,
}

impl ItemRef {
    /// The dataset-version identifier this link points at, derived without
    /// fetching the item: the link title when present, otherwise the href
    /// file stem.
    pub fn dataset_version_id(&self) -> &str {
        if let Some(title) = &self.title {
            return title;
        }

        let stem = self.href.rsplit('/').next().unwrap_or(&self.href);
        stem.strip_suffix(".stac.json").unwrap_or(stem)
    }
}

/// Named asset URLs extracted from a fetched item document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetSet {
    pub dataset_version_id: String,
    pub time_chunked: Option<String>,
    pub geo_chunked: Option<String>,
    pub native: Option<String>,
}

/// A degraded fetch during a catalog walk: the product or item contributed
/// nothing, the walk continued.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkWarning {
    pub product_id: String,
    /// `None` when the product listing itself failed.
    pub item_href: Option<String>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_version_suffix() {
        let (dataset, version) = split_dataset_version("cmems_mod_glo_phy_anfc_0.083deg_P1D-m_202406");
        assert_eq!(dataset, "cmems_mod_glo_phy_anfc_0.083deg_P1D-m");
        assert_eq!(version.as_deref(), Some("202406"));
    }

    #[test]
    fn test_split_round_trip() {
        let (dataset, version) = split_dataset_version("A_ds1_202411");
        assert_eq!(format!("{}_{}", dataset, version.unwrap()), "A_ds1_202411");
    }

    #[test]
    fn test_split_without_suffix() {
        assert_eq!(
            split_dataset_version("global-analysis-forecast"),
            ("global-analysis-forecast".to_string(), None)
        );
    }

    #[test]
    fn test_split_rejects_short_and_non_numeric_tails() {
        assert_eq!(split_dataset_version("ds_2024").1, None);
        assert_eq!(split_dataset_version("ds_2024111").1, None);
        assert_eq!(split_dataset_version("ds_2024ab").1, None);
    }

    #[test]
    fn test_row_derives_columns_per_present_asset() {
        let assets = AssetSet {
            dataset_version_id: "ds1_202411".to_string(),
            time_chunked: Some("https://host/bkt/ds1_202411/timeChunked.zarr".to_string()),
            geo_chunked: None,
            native: None,
        };

        let row = CatalogRow::from_assets("PROD", assets, AccessMode::HttpRange);

        assert_eq!(row.dataset_id, "ds1");
        assert_eq!(row.version.as_deref(), Some("202411"));
        assert_eq!(
            row.time_chunked_uri.as_deref(),
            Some("s3://bkt/ds1_202411/timeChunked.zarr")
        );
        assert!(row.time_chunked_dsn.as_deref().unwrap().starts_with("ZARR:\"/vsicurl/"));
        assert!(row.geo_chunked_dsn.is_none());
        assert!(row.native_uri.is_none());
        assert!(row.is_arco());
    }

    #[test]
    fn test_malformed_asset_url_leaves_columns_absent() {
        let assets = AssetSet {
            dataset_version_id: "ds1".to_string(),
            time_chunked: Some("not-a-url".to_string()),
            geo_chunked: None,
            native: None,
        };

        let row = CatalogRow::from_assets("PROD", assets, AccessMode::ObjectStorage);

        // The unusable URL is kept, its derived columns are not.
        assert_eq!(row.time_chunked_url.as_deref(), Some("not-a-url"));
        assert!(row.time_chunked_dsn.is_none());
        assert!(row.time_chunked_uri.is_none());
        assert!(row.is_arco());
    }

    #[test]
    fn test_static_dataset_row_has_no_assets() {
        let assets = AssetSet {
            dataset_version_id: "insitu_obs".to_string(),
            ..Default::default()
        };

        let row = CatalogRow::from_assets("PROD", assets, AccessMode::HttpRange);
        assert!(!row.is_arco());
        assert_eq!(row.dataset_id, "insitu_obs");
    }

    #[test]
    fn test_item_ref_id_prefers_title() {
        let item = ItemRef {
            href: "ds1_202411.stac.json".to_string(),
            title: Some("ds1_202411".to_string()),
        };
        assert_eq!(item.dataset_version_id(), "ds1_202411");
    }

    #[test]
    fn test_item_ref_id_falls_back_to_href_stem() {
        let item = ItemRef {
            href: "items/ds2_202501.stac.json".to_string(),
            title: None,
        };
        assert_eq!(item.dataset_version_id(), "ds2_202501");
    }
}
