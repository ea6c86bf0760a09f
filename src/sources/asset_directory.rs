//! Remote asset-directory adapter
//!
//! Walks a GitHub-contents-style listing of logo assets (one directory
//! per country, files within), downloads every file into the local
//! asset store, and rasterizes vector assets through the injected
//! [`Rasterizer`]. The canonical key comes from the asset's base
//! filename, not any display name. Conversion is skipped when the
//! raster derivative already exists, so re-runs do not redo work.
//!
//! This is the highest-priority logo source: curated, asset-backed
//! logos beat anything scraped later in the merge order.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::LogoSource;
use crate::assets::store::AssetIndex;
use crate::assets::{AssetStore, Rasterizer};
use crate::errors::SourceError;
use crate::fetch::HttpFetcher;
use crate::models::{LogoMap, LogoReference, SourceReport};
use crate::utils::normalize::NameNormalizer;

/// One entry of a contents listing.
#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    url: String,
}

pub struct AssetDirectorySource {
    fetcher: HttpFetcher,
    normalizer: NameNormalizer,
    store: AssetStore,
    rasterizer: Arc<dyn Rasterizer>,
    listing_url: String,
    raw_base_url: String,
    index_path: PathBuf,
}

impl AssetDirectorySource {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fetcher: HttpFetcher,
        normalizer: NameNormalizer,
        store: AssetStore,
        rasterizer: Arc<dyn Rasterizer>,
        listing_url: String,
        raw_base_url: String,
        index_path: PathBuf,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            store,
            rasterizer,
            listing_url,
            raw_base_url,
            index_path,
        }
    }

    /// Walk the full listing and persist the per-country asset index.
    /// Only the top-level listing fetch is fatal to this source; every
    /// failure below it (one country, one file, one conversion, the
    /// index write) degrades to a skipped item.
    pub async fn collect(&self) -> Result<LogoMap, SourceError> {
        let countries: Vec<DirectoryEntry> = self.fetcher.get_json(&self.listing_url).await?;
        let mut logos = LogoMap::new();
        let mut index = AssetIndex::new();

        for country in countries.iter().filter(|e| e.kind == "dir") {
            let files: Vec<DirectoryEntry> = match self.fetcher.get_json(&country.url).await {
                Ok(files) => files,
                Err(e) => {
                    warn!("Skipping country '{}': {}", country.name, e);
                    continue;
                }
            };

            let names = index.entry(country.name.clone()).or_default();

            for file in files.iter().filter(|e| e.kind == "file") {
                if self.ingest_file(&country.name, &file.name, &mut logos).await {
                    names.push(file.name.clone());
                }
                self.fetcher.pause().await;
            }

            info!(
                "Asset directory: country '{}' done ({} files)",
                country.name,
                names.len()
            );
        }

        // The index is an inspection artifact; failing to write it
        // does not discard the logos the walk produced.
        if let Err(e) = self.store.write_index(&self.index_path, &index).await {
            warn!("Failed to write asset index: {}", e);
        }

        Ok(logos)
    }

    /// Download one asset and, for vector assets, ensure its raster
    /// derivative exists and is registered in the logo map. Returns
    /// whether the asset was stored.
    async fn ingest_file(&self, country: &str, file_name: &str, logos: &mut LogoMap) -> bool {
        let raw_url = format!("{}/{}/{}", self.raw_base_url, country, file_name);
        let data = match self.fetcher.get_bytes(&raw_url).await {
            Ok(data) => data,
            Err(e) => {
                warn!("Skipping asset {}: {}", raw_url, e);
                return false;
            }
        };

        if let Err(e) = self.store.save_asset(country, file_name, &data).await {
            warn!("Failed to store asset {}/{}: {}", country, file_name, e);
            return false;
        }

        if !is_vector(file_name) {
            return true;
        }

        if !self.store.has_raster(country, file_name).await {
            let raster = match self.rasterizer.rasterize(&data, file_name) {
                Ok(raster) => raster,
                Err(e) => {
                    warn!("Skipping logo entry for {}: {}", file_name, e);
                    return true;
                }
            };
            if let Err(e) = self.store.save_raster(country, file_name, &raster).await {
                warn!("Failed to store raster for {}: {}", file_name, e);
                return true;
            }
        } else {
            debug!("Raster for {}/{} already present", country, file_name);
        }

        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let raster_path = self.store.raster_path(country, file_name);
        logos.insert(
            self.normalizer.canonicalize(&stem),
            LogoReference::new(self.store.reference_for(&raster_path)),
        );
        true
    }
}

fn is_vector(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".svg")
}

#[async_trait]
impl LogoSource for AssetDirectorySource {
    fn name(&self) -> &str {
        "asset-directory"
    }

    async fn produce(&self) -> SourceReport {
        match self.collect().await {
            Ok(logos) => SourceReport::resolved(self.name(), logos),
            Err(e) => SourceReport::skipped(self.name(), e.to_string()),
        }
    }
}
