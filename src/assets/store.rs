//! On-disk asset store for downloaded logo files
//!
//! Layout mirrors the remote listing: one directory per country code
//! under the store root, holding the downloaded files plus any raster
//! derivatives. Writes are once-per-run, single-writer; an existing
//! raster derivative short-circuits conversion so re-runs are cheap.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::errors::AppResult;

/// Per-country index of stored asset filenames, serialized as the
/// asset index JSON output.
pub type AssetIndex = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an asset will be stored at.
    pub fn asset_path(&self, country: &str, file_name: &str) -> PathBuf {
        self.root.join(country).join(file_name)
    }

    /// Path of the raster derivative for a vector asset.
    pub fn raster_path(&self, country: &str, file_name: &str) -> PathBuf {
        self.asset_path(country, file_name).with_extension("png")
    }

    /// Write a downloaded asset, creating directories on demand.
    pub async fn save_asset(
        &self,
        country: &str,
        file_name: &str,
        data: &[u8],
    ) -> AppResult<PathBuf> {
        let path = self.asset_path(country, file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;
        Ok(path)
    }

    /// Write a raster derivative next to its source asset.
    pub async fn save_raster(
        &self,
        country: &str,
        file_name: &str,
        data: &[u8],
    ) -> AppResult<PathBuf> {
        let path = self.raster_path(country, file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;
        Ok(path)
    }

    /// True when the raster derivative already exists from a previous
    /// run, meaning conversion can be skipped.
    pub async fn has_raster(&self, country: &str, file_name: &str) -> bool {
        fs::try_exists(self.raster_path(country, file_name))
            .await
            .unwrap_or(false)
    }

    /// Logo reference string for a stored file: the path relative to
    /// the process working directory, with forward slashes so the
    /// reference is portable across playlists.
    pub fn reference_for(&self, path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }

    /// Persist the per-country asset index as pretty-printed JSON.
    pub async fn write_index(&self, path: &Path, index: &AssetIndex) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, serde_json::to_string_pretty(index)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_asset_creates_country_directories() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().to_path_buf());

        let path = store.save_asset("uk", "bbc-one.svg", b"<svg/>").await.unwrap();
        assert!(path.ends_with("uk/bbc-one.svg"));
        assert_eq!(fs::read(&path).await.unwrap(), b"<svg/>");
    }

    #[tokio::test]
    async fn raster_path_swaps_extension() {
        let store = AssetStore::new(PathBuf::from("logos"));
        assert_eq!(
            store.raster_path("uk", "bbc-one.svg"),
            PathBuf::from("logos/uk/bbc-one.png")
        );
    }

    #[tokio::test]
    async fn has_raster_reflects_saved_derivative() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().to_path_buf());

        assert!(!store.has_raster("uk", "bbc-one.svg").await);
        store.save_raster("uk", "bbc-one.svg", b"png").await.unwrap();
        assert!(store.has_raster("uk", "bbc-one.svg").await);
    }

    #[tokio::test]
    async fn write_index_round_trips_through_json() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().to_path_buf());
        let path = dir.path().join("meta/index.json");

        let mut index = AssetIndex::new();
        index.insert("uk".to_string(), vec!["bbc-one.svg".to_string()]);
        store.write_index(&path, &index).await.unwrap();

        let read: AssetIndex = serde_json::from_slice(&fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(read, index);
    }

    #[test]
    fn reference_uses_forward_slashes() {
        let store = AssetStore::new(PathBuf::from("logos"));
        let reference = store.reference_for(Path::new("logos\\uk\\bbc-one.png"));
        assert_eq!(reference, "logos/uk/bbc-one.png");
    }
}
