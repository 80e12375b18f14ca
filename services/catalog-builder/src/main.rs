//! Marine data store catalog builder.
//!
//! Walks the store's STAC tree into a tabular catalog snapshot on disk,
//! refreshing an existing snapshot incrementally (only identifiers the
//! snapshot does not know are fetched in full). Optional view filters and an
//! access-string printer sit on top of the assembled rows.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use stac_catalog::{
    arco_only, assemble_catalog, dsn, latest_per_dataset, load_snapshot, refresh_catalog,
    save_snapshot, AccessMode, AssembleConfig, CatalogRow, RefreshOutcome, StacClient,
};

/// Default STAC root of the marine data store metadata catalog.
const DEFAULT_ROOT_URL: &str = "https://stac.marine.copernicus.eu/metadata";

#[derive(Parser, Debug)]
#[command(name = "catalog-builder")]
#[command(about = "Build or refresh the ARCO dataset catalog snapshot")]
struct Args {
    /// STAC root URL (directory containing catalog.stac.json)
    #[arg(long, env = "STAC_ROOT_URL", default_value = DEFAULT_ROOT_URL)]
    root_url: String,

    /// Catalog snapshot path; loaded as the refresh baseline when present
    #[arg(long, env = "CATALOG_SNAPSHOT", default_value = "catalog.json")]
    snapshot: PathBuf,

    /// Ignore any existing snapshot and re-walk the whole catalog
    #[arg(long)]
    force_full: bool,

    /// Build only these products (implies a scoped full build)
    #[arg(short, long)]
    product: Vec<String>,

    /// Storage scheme for derived access strings: "http" (vsicurl, no
    /// credentials) or "s3" (vsis3, anonymous-access environment required)
    #[arg(long, default_value = "http")]
    mode: String,

    /// Maximum concurrent item fetches within one product
    #[arg(long, default_value = "4")]
    concurrency: usize,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Report only the latest version of each dataset
    #[arg(long)]
    latest_only: bool,

    /// Report only datasets with at least one chunked store
    #[arg(long)]
    arco_only: bool,

    /// Print access strings for this dataset-version after the build
    #[arg(long)]
    print_access: Option<String>,

    /// Named array within the store for --print-access
    #[arg(long)]
    array: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mode = match args.mode.as_str() {
        "http" => AccessMode::HttpRange,
        "s3" => AccessMode::ObjectStorage,
        other => bail!("unknown access mode '{}', expected 'http' or 's3'", other),
    };

    let config = AssembleConfig {
        mode,
        concurrency: args.concurrency,
    };

    let client = StacClient::new(args.root_url.as_str(), Duration::from_secs(args.timeout_secs))
        .context("Failed to create HTTP client")?;

    info!(root = %args.root_url, snapshot = %args.snapshot.display(), "Starting catalog build");

    let progress = |index: usize, total: usize, product_id: &str| {
        info!(product = %product_id, index, total, "Walking product");
    };

    let outcome = if !args.product.is_empty() {
        let build =
            assemble_catalog(&client, Some(args.product.clone()), &config, Some(&progress))
                .await?;
        RefreshOutcome {
            new_count: build.rows.len(),
            rows: build.rows,
            warnings: build.warnings,
        }
    } else if args.force_full || !args.snapshot.exists() {
        let build = assemble_catalog(&client, None, &config, Some(&progress)).await?;
        RefreshOutcome {
            new_count: build.rows.len(),
            rows: build.rows,
            warnings: build.warnings,
        }
    } else {
        let baseline = load_snapshot(&args.snapshot)
            .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
        refresh_catalog(&client, baseline.rows, false, &config, Some(&progress)).await?
    };

    save_snapshot(&args.snapshot, &outcome.rows)
        .with_context(|| format!("Failed to save snapshot {}", args.snapshot.display()))?;

    let mut view = outcome.rows.clone();
    if args.latest_only {
        view = latest_per_dataset(&view);
    }
    if args.arco_only {
        view = arco_only(&view);
    }

    info!(
        rows = outcome.rows.len(),
        view_rows = view.len(),
        new = outcome.new_count,
        warnings = outcome.warnings.len(),
        "Catalog build complete"
    );

    if let Some(id) = &args.print_access {
        print_access_strings(&view, id, mode, args.array.as_deref())?;
    }

    Ok(())
}

/// Print the GDAL access string, the object-storage URI, and a ready-to-run
/// inspection command for every asset of one dataset-version.
fn print_access_strings(
    rows: &[CatalogRow],
    dataset_version_id: &str,
    mode: AccessMode,
    array: Option<&str>,
) -> Result<()> {
    let matches: Vec<&CatalogRow> = rows
        .iter()
        .filter(|row| row.dataset_version_id == dataset_version_id)
        .collect();

    if matches.is_empty() {
        bail!("dataset-version '{}' not found in the catalog view", dataset_version_id);
    }

    for row in matches {
        println!("{} ({})", row.dataset_version_id, row.product_id);

        let assets = [
            ("timeChunked", row.time_chunked_url.as_deref()),
            ("geoChunked", row.geo_chunked_url.as_deref()),
            ("native", row.native_url.as_deref()),
        ];

        for (name, url) in assets {
            let Some(url) = url else { continue };

            // Recompute rather than reuse the row's derived columns: the
            // requested mode and array name may differ from the snapshot's.
            let access = dsn::to_access_string(url, mode, array);
            let uri = dsn::to_object_uri(url);
            let endpoint = dsn::object_storage_endpoint(url);

            match (access, uri, endpoint) {
                (Ok(access), Ok(uri), Ok(endpoint)) => {
                    println!("  {}:", name);
                    println!("    {}", access);
                    println!("    {}", uri);
                    println!("    {}", dsn::to_shell_command(&access, &endpoint));
                }
                _ => warn!(asset = name, url = %url, "Asset URL is not rewritable, skipping"),
            }
        }
    }

    Ok(())
}
