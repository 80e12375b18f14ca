//! GDAL access-string and object-URI derivation.
//!
//! Pure string rewrites from an asset's HTTPS URL to the connection strings
//! consumed by GDAL's multidimensional Zarr driver. Nothing here performs
//! I/O; the emitted strings are handed to GDAL opaquely.

use crate::error::FormatError;

/// GDAL driver prefix for chunked array stores.
const DRIVER: &str = "ZARR";

/// How GDAL should reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// `/vsicurl/` plain HTTP range reads. Works without any credentials or
    /// environment setup.
    HttpRange,
    /// `/vsis3/` object-storage reads. Requires `AWS_NO_SIGN_REQUEST` and
    /// `AWS_S3_ENDPOINT` in the process environment (see [`to_shell_command`]).
    ObjectStorage,
}

/// Split `https://{host}/{bucket-and-key}` into its host and path parts.
fn split_https(url: &str) -> Result<(&str, &str), FormatError> {
    let rest = url
        .strip_prefix("https://")
        .ok_or_else(|| FormatError::Scheme(url.to_string()))?;

    let slash = rest
        .find('/')
        .ok_or_else(|| FormatError::MissingPath(url.to_string()))?;

    let (host, path) = (&rest[..slash], &rest[slash + 1..]);
    if host.is_empty() || path.is_empty() {
        return Err(FormatError::MissingPath(url.to_string()));
    }

    Ok((host, path))
}

/// Rewrite an asset URL into a GDAL Zarr access string.
///
/// `array` selects a named array within the store, e.g.
/// `ZARR:"/vsis3/bucket/key":/thetao`.
pub fn to_access_string(
    url: &str,
    mode: AccessMode,
    array: Option<&str>,
) -> Result<String, FormatError> {
    let (_, path) = split_https(url)?;

    let dsn = match mode {
        AccessMode::HttpRange => format!("{}:\"/vsicurl/{}\"", DRIVER, url),
        AccessMode::ObjectStorage => format!("{}:\"/vsis3/{}\"", DRIVER, path),
    };

    Ok(match array {
        Some(name) => format!("{}:/{}", dsn, name),
        None => dsn,
    })
}

/// Rewrite an asset URL into an `s3://{bucket}/{key}` URI.
///
/// The bucket is the first path segment after the host; the key is the
/// remainder.
pub fn to_object_uri(url: &str) -> Result<String, FormatError> {
    let (_, path) = split_https(url)?;
    Ok(format!("s3://{}", path))
}

/// The object-storage endpoint host serving an asset URL, suitable as the
/// `AWS_S3_ENDPOINT` value for `/vsis3/` access.
pub fn object_storage_endpoint(url: &str) -> Result<String, FormatError> {
    let (host, _) = split_https(url)?;
    Ok(host.to_string())
}

/// Build the shell invocation that inspects a store through GDAL with
/// anonymous object-storage access.
///
/// Pure formatting; the command is never executed here. The DSN is
/// single-quoted because it contains double quotes.
pub fn to_shell_command(dsn: &str, endpoint: &str) -> String {
    format!(
        "AWS_NO_SIGN_REQUEST=YES AWS_S3_ENDPOINT={} gdalmdiminfo '{}'",
        endpoint, dsn
    )
}
