//! Loader configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/data";
pub const DEFAULT_CATALOG_PATH: &str = "stars.dat";
pub const DEFAULT_NAMES_PATH: &str = "starnames.dat";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where [`CatalogLoader`](crate::CatalogLoader) fetches its two resources
/// and what it does with them.
///
/// Deserializes with every field optional, so hosts can embed it in their
/// own configuration files:
///
/// ```
/// use celestial_stars::LoaderConfig;
///
/// let config: LoaderConfig =
///     serde_json::from_str(r#"{ "base_url": "https://example.org/sky", "max_stars": 5000 }"#)
///         .unwrap();
/// assert_eq!(config.catalog_url(), "https://example.org/sky/stars.dat");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub base_url: String,
    /// Catalog path relative to `base_url`, or an absolute `http(s)://` URL.
    pub catalog_path: String,
    /// Name table path relative to `base_url`, or an absolute `http(s)://` URL.
    pub names_path: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Downsample to this many stars after loading.
    pub max_stars: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            names_path: DEFAULT_NAMES_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("celestial-stars/{}", env!("CARGO_PKG_VERSION")),
            max_stars: None,
        }
    }
}

impl LoaderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_paths(
        mut self,
        catalog_path: impl Into<String>,
        names_path: impl Into<String>,
    ) -> Self {
        self.catalog_path = catalog_path.into();
        self.names_path = names_path.into();
        self
    }

    pub fn with_max_stars(mut self, max_stars: usize) -> Self {
        self.max_stars = Some(max_stars);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn catalog_url(&self) -> String {
        self.resolve(&self.catalog_path)
    }

    pub fn names_url(&self) -> String {
        self.resolve(&self.names_path)
    }

    fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }
}
