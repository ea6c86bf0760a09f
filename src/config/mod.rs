use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::utils::normalize::NormalizationRules;

/// Application configuration.
///
/// Everything that used to be hardcoded in the importer scripts is
/// enumerated here and handed to each component at construction:
/// source URLs and their priority order, normalization rules, the
/// uniform request timeout, and output paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sources: SourcesConfig,
    pub http: HttpConfig,
    pub normalization: NormalizationRules,
    pub storage: StorageConfig,
}

/// External sources, listed in merge priority order: the asset
/// directory first, then the JSON indexes in the order given, with
/// the Wikipedia fallback last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Contents-API style listing of the logo asset repository
    pub asset_listing_url: String,
    /// Raw download base for files in the listing
    pub asset_raw_base_url: String,
    /// JSON channel indexes, highest priority first
    pub json_index_urls: Vec<String>,
    /// Remote playlists mined for channel names
    pub playlist_urls: Vec<String>,
    /// Free-text search endpoint for the fallback scrape
    pub wikipedia_search_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Uniform per-request timeout in seconds
    pub timeout_secs: u64,
    /// Fixed politeness delay between consecutive asset downloads,
    /// in milliseconds
    pub request_delay_ms: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of the on-disk asset store
    pub asset_root: PathBuf,
    /// Logo-map snapshot (pretty-printed JSON, key to reference)
    pub snapshot_path: PathBuf,
    /// Asset index (JSON, country code to filenames)
    pub index_path: PathBuf,
    /// Generated master playlist
    pub master_playlist_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourcesConfig {
                asset_listing_url:
                    "https://api.github.com/repos/tv-logo/tv-logos/contents/countries".to_string(),
                asset_raw_base_url:
                    "https://raw.githubusercontent.com/tv-logo/tv-logos/main/countries".to_string(),
                json_index_urls: vec![
                    "https://raw.githubusercontent.com/iptv-org/iptv/master/channels.json"
                        .to_string(),
                ],
                playlist_urls: vec![
                    "https://raw.githubusercontent.com/iptv-org/iptv/master/channels.m3u"
                        .to_string(),
                ],
                wikipedia_search_url: "https://en.wikipedia.org/w/index.php".to_string(),
            },
            http: HttpConfig {
                timeout_secs: 30,
                request_delay_ms: 200,
                user_agent: format!("m3u-logoweave/{}", env!("CARGO_PKG_VERSION")),
            },
            normalization: NormalizationRules::default(),
            storage: StorageConfig {
                asset_root: PathBuf::from("./data/logos/countries"),
                snapshot_path: PathBuf::from("./data/logos/logo-map.json"),
                index_path: PathBuf::from("./data/logos/index.json"),
                master_playlist_path: PathBuf::from("./data/output_with_logos.m3u"),
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, writing the defaults out
    /// when the file does not exist yet.
    pub fn load(path: &Path) -> AppResult<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)
                .map_err(|e| crate::errors::AppError::configuration(e.to_string()))
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)
                .map_err(|e| crate::errors::AppError::configuration(e.to_string()))?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, contents)?;
            Ok(default_config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.http.timeout_secs, config.http.timeout_secs);
        assert_eq!(parsed.sources.json_index_urls, config.sources.json_index_urls);
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.http.timeout_secs, 30);

        // Second load reads the file it just wrote.
        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.http.request_delay_ms, config.http.request_delay_ms);
    }
}
