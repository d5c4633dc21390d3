// Catalog sources: where the three collections are read from at startup

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::catalog::{Catalog, CatalogError};
use crate::config::CatalogLocation;

pub const RATES_FILE: &str = "rates.json";
pub const MULTIPLIERS_FILE: &str = "multipliers.json";
pub const HOTELS_FILE: &str = "hotels.json";

#[async_trait]
pub trait CatalogSource: Send + Sync {
    // Read, parse, and validate all three collections; any failure is fatal
    async fn load(&self) -> Result<Catalog, CatalogError>;

    fn describe(&self) -> String;
}

// Three JSON files side by side in one directory
pub struct JsonDirectorySource {
    dir: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read(&self, name: &str) -> Result<String, CatalogError> {
        let path = self.dir.join(name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| CatalogError::ReadError { path, source })
    }
}

#[async_trait]
impl CatalogSource for JsonDirectorySource {
    async fn load(&self) -> Result<Catalog, CatalogError> {
        let (rates, multipliers, hotels) = futures::try_join!(
            self.read(RATES_FILE),
            self.read(MULTIPLIERS_FILE),
            self.read(HOTELS_FILE)
        )?;

        let catalog = Catalog::from_json(&rates, &multipliers, &hotels)?;
        log_loaded(&catalog, &self.describe());
        Ok(catalog)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

// The same three collections served over HTTP as `<base_url>/<file>`
pub struct HttpCatalogSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalogSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn fetch(&self, name: &str) -> Result<String, CatalogError> {
        let url = format!("{}/{}", self.base_url, name);
        let http_error = |e: reqwest::Error| CatalogError::HttpError {
            url: url.clone(),
            message: e.to_string(),
        };

        self.client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(http_error)?
            .text()
            .await
            .map_err(http_error)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn load(&self) -> Result<Catalog, CatalogError> {
        let (rates, multipliers, hotels) = futures::try_join!(
            self.fetch(RATES_FILE),
            self.fetch(MULTIPLIERS_FILE),
            self.fetch(HOTELS_FILE)
        )?;

        let catalog = Catalog::from_json(&rates, &multipliers, &hotels)?;
        log_loaded(&catalog, &self.describe());
        Ok(catalog)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

pub fn source_for(location: &CatalogLocation) -> Box<dyn CatalogSource> {
    match location {
        CatalogLocation::Directory(dir) => Box::new(JsonDirectorySource::new(dir.as_path())),
        CatalogLocation::Url(url) => Box::new(HttpCatalogSource::new(url.as_str())),
    }
}

fn log_loaded(catalog: &Catalog, origin: &str) {
    info!(
        origin,
        rates = catalog.rates().len(),
        multipliers = catalog.multipliers().len(),
        hotels = catalog.hotels().len(),
        "catalog loaded"
    );
}

// Sample catalog shipped with the crate
pub fn sample_dir() -> &'static Path {
    Path::new(crate::config::DEFAULT_CATALOG_DIR)
}
