//! Asynchronous loading of the catalog and name table over HTTP.
//!
//! [`CatalogLoader::fetch`] downloads both resources concurrently, then
//! decodes the catalog and attaches the names. [`CatalogLoader::load`] is the
//! callback form: the outcome, success or failure, is always delivered to
//! the callback. Dropping the future before it completes abandons the load
//! and the callback never runs.

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::LoaderConfig;
use crate::error::{CatalogError, CatalogResult};

pub struct CatalogLoader {
    config: LoaderConfig,
    client: reqwest::Client,
}

impl CatalogLoader {
    pub fn new(config: LoaderConfig) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                CatalogError::fetch("HTTP client", format!("failed to create client: {}", e))
            })?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Fetch, decode and name the catalog.
    ///
    /// Both downloads must succeed; names are attached only after the
    /// catalog has been decoded. `max_stars` from the config is applied
    /// last.
    ///
    /// # Errors
    /// [`CatalogError::Fetch`] for network or HTTP failures, and any decode
    /// error from [`Catalog::read`].
    pub async fn fetch(&self) -> CatalogResult<Catalog> {
        let catalog_url = self.config.catalog_url();
        let names_url = self.config.names_url();
        info!(%catalog_url, %names_url, "Fetching star catalog");

        let (bytes, names) = tokio::try_join!(
            self.fetch_bytes(&catalog_url),
            self.fetch_text(&names_url)
        )?;
        debug!(
            catalog_bytes = bytes.len(),
            names_bytes = names.len(),
            "Downloaded catalog resources"
        );

        let mut catalog = Catalog::new().read(&bytes)?;
        if !catalog.is_empty() {
            catalog.read_names(&names)?;
        }
        if let Some(max_stars) = self.config.max_stars {
            catalog = catalog.downsample(max_stars);
        }

        info!(
            stars = catalog.num_stars(),
            names = catalog.name_count(),
            "Star catalog ready"
        );
        Ok(catalog)
    }

    /// Fetch the catalog and hand the result to `on_ready`.
    pub async fn load<F>(&self, on_ready: F)
    where
        F: FnOnce(CatalogResult<Catalog>),
    {
        on_ready(self.fetch().await);
    }

    async fn get(&self, url: &str) -> CatalogResult<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::fetch(url, format!("network request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CatalogError::fetch(
                url,
                format!("HTTP request failed with status: {}", response.status()),
            ));
        }
        Ok(response)
    }

    async fn fetch_bytes(&self, url: &str) -> CatalogResult<Vec<u8>> {
        let body = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| CatalogError::fetch(url, format!("failed to read response: {}", e)))?;
        Ok(body.to_vec())
    }

    async fn fetch_text(&self, url: &str) -> CatalogResult<String> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| CatalogError::fetch(url, format!("failed to read response: {}", e)))
    }
}
