//! In-memory STAC tree for walk/assemble/refresh tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use stac_catalog::{AssetSet, FetchError, ItemRef, StacSource};

/// Fake catalog tree with per-node failure injection and fetch counters.
#[derive(Default)]
pub struct FakeSource {
    products: Vec<String>,
    items: HashMap<String, Vec<ItemRef>>,
    assets: HashMap<(String, String), AssetSet>,

    broken_root: bool,
    broken_products: HashSet<String>,
    broken_items: HashSet<(String, String)>,

    pub root_listings: AtomicUsize,
    pub product_listings: AtomicUsize,
    pub item_fetches: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, product_id: &str) -> Self {
        self.products.push(product_id.to_string());
        self.items.entry(product_id.to_string()).or_default();
        self
    }

    /// Register a dataset-version item under a product. The item's href is
    /// `{id}.stac.json` and its link title is the id, matching the upstream
    /// layout.
    pub fn with_item(mut self, product_id: &str, id: &str, assets: &[(&str, &str)]) -> Self {
        if !self.products.iter().any(|p| p == product_id) {
            self.products.push(product_id.to_string());
        }

        let href = format!("{}.stac.json", id);
        self.items
            .entry(product_id.to_string())
            .or_default()
            .push(ItemRef {
                href: href.clone(),
                title: Some(id.to_string()),
            });

        let mut set = AssetSet {
            dataset_version_id: id.to_string(),
            ..Default::default()
        };
        for (name, url) in assets {
            match *name {
                "timeChunked" => set.time_chunked = Some(url.to_string()),
                "geoChunked" => set.geo_chunked = Some(url.to_string()),
                "native" => set.native = Some(url.to_string()),
                other => panic!("unknown asset name in fixture: {}", other),
            }
        }

        self.assets.insert((product_id.to_string(), href), set);
        self
    }

    pub fn with_broken_root(mut self) -> Self {
        self.broken_root = true;
        self
    }

    /// Make the product's listing fetch fail.
    pub fn with_broken_product(mut self, product_id: &str) -> Self {
        if !self.products.iter().any(|p| p == product_id) {
            self.products.push(product_id.to_string());
        }
        self.broken_products.insert(product_id.to_string());
        self
    }

    /// Make one item's asset fetch fail.
    pub fn with_broken_item(mut self, product_id: &str, id: &str) -> Self {
        let href = format!("{}.stac.json", id);
        self.items
            .entry(product_id.to_string())
            .or_default()
            .push(ItemRef {
                href: href.clone(),
                title: Some(id.to_string()),
            });
        self.broken_items.insert((product_id.to_string(), href));
        self
    }

    fn unavailable(url: String) -> FetchError {
        FetchError::Status {
            url,
            status: reqwest::StatusCode::NOT_FOUND,
        }
    }
}

#[async_trait]
impl StacSource for FakeSource {
    async fn list_product_ids(&self) -> Result<Vec<String>, FetchError> {
        self.root_listings.fetch_add(1, Ordering::SeqCst);
        if self.broken_root {
            return Err(Self::unavailable("catalog.stac.json".to_string()));
        }
        Ok(self.products.clone())
    }

    async fn list_items(&self, product_id: &str) -> Result<Vec<ItemRef>, FetchError> {
        self.product_listings.fetch_add(1, Ordering::SeqCst);
        if self.broken_products.contains(product_id) {
            return Err(Self::unavailable(format!("{}/product.stac.json", product_id)));
        }
        Ok(self.items.get(product_id).cloned().unwrap_or_default())
    }

    async fn fetch_item_assets(
        &self,
        product_id: &str,
        item_href: &str,
    ) -> Result<AssetSet, FetchError> {
        self.item_fetches.fetch_add(1, Ordering::SeqCst);

        let key = (product_id.to_string(), item_href.to_string());
        if self.broken_items.contains(&key) {
            return Err(Self::unavailable(format!("{}/{}", product_id, item_href)));
        }

        self.assets
            .get(&key)
            .cloned()
            .ok_or_else(|| Self::unavailable(format!("{}/{}", product_id, item_href)))
    }
}
