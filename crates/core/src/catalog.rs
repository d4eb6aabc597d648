use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::config::{CatalogConfig, CatalogSource};
use crate::domain::product::{Product, ProductId};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not a JSON array of products: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to fetch catalog from `{url}`: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Read-only product snapshot. Records that fail validation are dropped with a
/// warning rather than failing the whole load.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let records: Vec<serde_json::Value> = serde_json::from_str(raw)?;
        let total = records.len();

        let products: Vec<Product> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<Product>(record) {
                Ok(product) => match validate(&product) {
                    Ok(()) => Some(product),
                    Err(reason) => {
                        tracing::warn!(
                            event_name = "catalog.record_rejected",
                            index,
                            product_id = product.id.as_str(),
                            reason,
                            "skipping invalid catalog record"
                        );
                        None
                    }
                },
                Err(error) => {
                    tracing::warn!(
                        event_name = "catalog.record_rejected",
                        index,
                        error = %error,
                        "skipping undecodable catalog record"
                    );
                    None
                }
            })
            .collect();

        tracing::debug!(event_name = "catalog.loaded", total, accepted = products.len(), "catalog decoded");
        Ok(Self { products })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| CatalogError::Read { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw)
    }

    /// Fetches a full snapshot over HTTP. The response body must be the same
    /// JSON array shape as the bundled catalog.
    pub async fn fetch(url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let fetch_error = |source| CatalogError::Fetch { url: url.to_string(), source };
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(fetch_error)?;
        let body = client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(fetch_error)?
            .text()
            .await
            .map_err(fetch_error)?;
        Self::from_json_str(&body)
    }

    pub async fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        match config.source() {
            CatalogSource::Builtin => Self::builtin(),
            CatalogSource::File(path) => Self::load(&path),
            CatalogSource::Remote(url) => {
                Self::fetch(&url, Duration::from_secs(config.fetch_timeout_secs)).await
            }
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// Distinct category slugs, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.products
            .iter()
            .map(|product| product.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn validate(product: &Product) -> Result<(), &'static str> {
    if product.id.as_str().trim().is_empty() {
        return Err("empty id");
    }
    if product.name.trim().is_empty() {
        return Err("empty name");
    }
    if !(0.0..=5.0).contains(&product.rating) {
        return Err("rating outside 0-5");
    }
    Ok(())
}
