//! STAC tree walking over HTTP.
//!
//! The marine data store publishes its catalog as a tree of JSON documents:
//! a root `catalog.stac.json` linking to per-product directories, a
//! `product.stac.json` per product linking to dataset-version items, and one
//! item document per dataset-version carrying the named asset URLs.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::model::{AssetSet, ItemRef};

/// Asset names of interest on an item document. Anything else the item
/// carries is ignored.
const ASSET_TIME_CHUNKED: &str = "timeChunked";
const ASSET_GEO_CHUNKED: &str = "geoChunked";
const ASSET_NATIVE: &str = "native";

/// The three walk operations the assembler and refresh logic are written
/// against. `StacClient` is the HTTP implementation; tests substitute
/// in-memory fakes.
#[async_trait]
pub trait StacSource: Send + Sync {
    /// Product identifiers listed by the root catalog document. Failure here
    /// is fatal for a full walk.
    async fn list_product_ids(&self) -> Result<Vec<String>, FetchError>;

    /// Item links of one product's document.
    async fn list_items(&self, product_id: &str) -> Result<Vec<ItemRef>, FetchError>;

    /// Named asset URLs of one item document.
    async fn fetch_item_assets(
        &self,
        product_id: &str,
        item_href: &str,
    ) -> Result<AssetSet, FetchError>;
}

/// A `links[]` entry of a catalog or product document.
#[derive(Debug, Deserialize)]
struct Link {
    #[serde(default)]
    rel: String,
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// Root catalog or per-product document; only the links matter here.
#[derive(Debug, Deserialize)]
struct LinksDoc {
    #[serde(default)]
    links: Vec<Link>,
}

impl LinksDoc {
    /// Titles of `rel == "child"` links: the product identifiers.
    fn child_titles(self) -> Vec<String> {
        self.links
            .into_iter()
            .filter(|l| l.rel == "child")
            .filter_map(|l| l.title)
            .collect()
    }

    /// `rel == "item"` links: the product's dataset-version items.
    fn item_refs(self) -> Vec<ItemRef> {
        self.links
            .into_iter()
            .filter(|l| l.rel == "item")
            .filter_map(|l| {
                l.href.map(|href| ItemRef {
                    href,
                    title: l.title,
                })
            })
            .collect()
    }
}

/// A dataset-version item document.
#[derive(Debug, Deserialize)]
struct ItemDoc {
    id: String,
    #[serde(default)]
    assets: HashMap<String, AssetLink>,
}

#[derive(Debug, Deserialize)]
struct AssetLink {
    href: String,
}

impl ItemDoc {
    fn into_asset_set(mut self) -> AssetSet {
        let time_chunked = self.assets.remove(ASSET_TIME_CHUNKED).map(|a| a.href);
        let geo_chunked = self.assets.remove(ASSET_GEO_CHUNKED).map(|a| a.href);
        let native = self.assets.remove(ASSET_NATIVE).map(|a| a.href);

        AssetSet {
            dataset_version_id: self.id,
            time_chunked,
            geo_chunked,
            native,
        }
    }
}

/// HTTP client for the STAC tree. One synchronous-feeling GET per document,
/// no retry; the per-request timeout is the only tuning knob.
pub struct StacClient {
    client: Client,
    root_url: String,
}

impl StacClient {
    /// Build a client for the catalog rooted at `root_url` (the directory
    /// containing `catalog.stac.json`, without a trailing slash).
    pub fn new(root_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            root_url: root_url.into(),
        })
    }

    /// Fetch one URL and parse the body as JSON.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!(url = %url, "Fetching STAC document");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            source: e,
        })
    }

    async fn fetch_doc<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let value = self.fetch_json(url).await?;
        serde_json::from_value(value).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl StacSource for StacClient {
    async fn list_product_ids(&self) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/catalog.stac.json", self.root_url);
        let doc: LinksDoc = self.fetch_doc(&url).await?;
        Ok(doc.child_titles())
    }

    async fn list_items(&self, product_id: &str) -> Result<Vec<ItemRef>, FetchError> {
        let url = format!("{}/{}/product.stac.json", self.root_url, product_id);
        let doc: LinksDoc = self.fetch_doc(&url).await?;
        Ok(doc.item_refs())
    }

    async fn fetch_item_assets(
        &self,
        product_id: &str,
        item_href: &str,
    ) -> Result<AssetSet, FetchError> {
        let url = format!("{}/{}/{}", self.root_url, product_id, item_href);
        let doc: ItemDoc = self.fetch_doc(&url).await?;
        Ok(doc.into_asset_set())
    }
}
