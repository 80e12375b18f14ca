//! Error types for catalog walking and access-string derivation.

use thiserror::Error;

/// Failure of a single HTTP fetch against the STAC API.
///
/// There is no retry at this level; callers decide whether a failed fetch is
/// fatal (the root catalog) or degrades one product/item contribution.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// An asset URL that does not match the `https://{host}/{bucket}/{key}` shape
/// expected by the access-string rewriters.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("not an https URL: {0}")]
    Scheme(String),

    #[error("URL has no bucket/key path: {0}")]
    MissingPath(String),
}

/// Failure loading or saving the persisted catalog snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not a valid catalog document: {0}")]
    Decode(#[from] serde_json::Error),
}
