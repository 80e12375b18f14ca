//! Snapshot persistence round-trips.

use stac_catalog::{load_snapshot, save_snapshot, AccessMode, AssetSet, CatalogRow, SnapshotError};

fn sample_rows() -> Vec<CatalogRow> {
    vec![
        CatalogRow::from_assets(
            "A",
            AssetSet {
                dataset_version_id: "A_ds1_202411".to_string(),
                time_chunked: Some("https://host/bkt/A/ds1_202411/timeChunked.zarr".to_string()),
                geo_chunked: None,
                native: Some("https://host/bkt/A/ds1_202411/native.zarr".to_string()),
            },
            AccessMode::HttpRange,
        ),
        CatalogRow::from_assets(
            "B",
            AssetSet {
                dataset_version_id: "B_static".to_string(),
                ..Default::default()
            },
            AccessMode::HttpRange,
        ),
    ]
}

#[test]
fn test_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let rows = sample_rows();
    save_snapshot(&path, &rows).unwrap();

    let snapshot = load_snapshot(&path).unwrap();
    assert_eq!(snapshot.rows, rows);
    assert!(snapshot.generated_at <= chrono::Utc::now());
}

#[test]
fn test_save_replaces_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    save_snapshot(&path, &sample_rows()).unwrap();
    save_snapshot(&path, &sample_rows()[..1]).unwrap();

    let snapshot = load_snapshot(&path).unwrap();
    assert_eq!(snapshot.rows.len(), 1);
}

#[test]
fn test_missing_snapshot_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_snapshot(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(SnapshotError::Io(_))));
}

#[test]
fn test_corrupt_snapshot_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, "{not json").unwrap();

    let result = load_snapshot(&path);
    assert!(matches!(result, Err(SnapshotError::Decode(_))));
}
