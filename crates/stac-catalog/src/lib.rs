//! Catalog toolkit for the marine data store's ARCO datasets.
//!
//! Walks the store's STAC tree of JSON documents, flattens every
//! dataset-version into a tabular catalog row, derives GDAL access strings
//! and object-storage URIs per asset, and reconciles a previously persisted
//! catalog incrementally instead of re-walking everything. All actual array
//! data access is delegated to GDAL via the emitted strings; this crate
//! never reads array bytes.

pub mod assemble;
pub mod dsn;
pub mod error;
pub mod filter;
pub mod model;
pub mod refresh;
pub mod snapshot;
pub mod stac;

pub use assemble::{assemble_catalog, AssembleConfig, CatalogBuild, ProgressFn};
pub use dsn::{
    object_storage_endpoint, to_access_string, to_object_uri, to_shell_command, AccessMode,
};
pub use error::{FetchError, FormatError, SnapshotError};
pub use filter::{arco_only, latest_per_dataset};
pub use model::{split_dataset_version, AssetSet, CatalogRow, ItemRef, WalkWarning};
pub use refresh::{refresh_catalog, RefreshOutcome};
pub use snapshot::{load_snapshot, save_snapshot, Snapshot};
pub use stac::{StacClient, StacSource};
