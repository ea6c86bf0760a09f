//! Run orchestration
//!
//! Drives the staged flow: asset directory, JSON indexes, playlist
//! discovery, fallback lookups, then output writing and playlist
//! injection. Source failures degrade per stage and are reported in
//! the final summary; only failures to write required output files
//! are fatal.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::assets::{AssetStore, ImageRasterizer, Rasterizer};
use crate::config::Config;
use crate::errors::AppResult;
use crate::fetch::HttpFetcher;
use crate::models::{ChannelRecord, LogoMap, SourceReport};
use crate::playlist;
use crate::resolver;
use crate::sources::{
    AssetDirectorySource, JsonIndexSource, LogoSource, PlaylistNameSource, WikipediaLogoSource,
};
use crate::utils::normalize::NameNormalizer;

/// What a run produced, for the final summary line.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Total entries in the merged logo map
    pub resolved_logos: usize,
    /// How many of those came from the fallback scrape
    pub fallback_logos: usize,
    /// Channels aggregated for the master playlist
    pub channels: usize,
    /// Sources skipped because they were unreachable or malformed
    pub skipped_sources: Vec<String>,
}

pub struct PipelineOptions {
    /// Skip the asset-directory walk (slow; downloads every asset)
    pub skip_assets: bool,
    /// Skip the Wikipedia fallback stage
    pub skip_fallback: bool,
    /// Existing playlist to inject logos into, with its output path
    pub inject: Option<(PathBuf, PathBuf)>,
}

pub struct Pipeline {
    config: Config,
    fetcher: HttpFetcher,
    normalizer: NameNormalizer,
    store: AssetStore,
    rasterizer: Arc<dyn Rasterizer>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let fetcher = HttpFetcher::new(
            Duration::from_secs(config.http.timeout_secs),
            Duration::from_millis(config.http.request_delay_ms),
            &config.http.user_agent,
        );
        let normalizer = NameNormalizer::new(config.normalization.clone());
        let store = AssetStore::new(config.storage.asset_root.clone());

        Self {
            config,
            fetcher,
            normalizer,
            store,
            rasterizer: Arc::new(ImageRasterizer),
        }
    }

    pub async fn run(&self, options: &PipelineOptions) -> AppResult<RunSummary> {
        let mut reports: Vec<SourceReport> = Vec::new();

        // Stage 1: curated logo assets (highest merge priority).
        if options.skip_assets {
            info!("Stage 1: asset directory skipped by request");
        } else {
            info!("Stage 1: fetching logo assets");
            let source = AssetDirectorySource::new(
                self.fetcher.clone(),
                self.normalizer.clone(),
                self.store.clone(),
                self.rasterizer.clone(),
                self.config.sources.asset_listing_url.clone(),
                self.config.sources.asset_raw_base_url.clone(),
                self.config.storage.index_path.clone(),
            );
            let report = source.produce().await;
            match &report.skipped {
                Some(reason) => warn!("Stage 1: asset directory unavailable: {}", reason),
                None => info!("Stage 1: {} asset-backed logos", report.logos.len()),
            }
            reports.push(report);
        }

        // Stage 2: JSON channel indexes.
        info!("Stage 2: fetching JSON channel indexes");
        let json_source = JsonIndexSource::new(
            self.fetcher.clone(),
            self.normalizer.clone(),
            self.config.sources.json_index_urls.clone(),
        );
        let (json_report, json_channels) = json_source
            .collect()
            .await
            .into_parts(json_source.name());
        info!(
            "Stage 2: {} indexed logos, {} channels",
            json_report.logos.len(),
            json_channels.len()
        );
        reports.push(json_report);

        // Stage 3: channel discovery from remote playlists.
        info!("Stage 3: discovering channels from playlists");
        let playlist_source = PlaylistNameSource::new(
            self.fetcher.clone(),
            self.normalizer.clone(),
            self.config.sources.playlist_urls.clone(),
        );
        let mut channels = json_channels;
        channels.extend(playlist_source.channels().await);
        info!("Stage 3: {} channels aggregated", channels.len());

        // Merge in priority order, first writer wins.
        let (mut logos, mut skipped_sources) = resolver::merge_reports(reports);

        // Stage 4: fallback lookups for whatever is still unresolved.
        let fallback_logos = if options.skip_fallback {
            info!("Stage 4: fallback lookups skipped by request");
            skipped_sources.push("wikipedia".to_string());
            0
        } else {
            info!("Stage 4: looking up missing logos");
            let wikipedia = WikipediaLogoSource::new(
                self.fetcher.clone(),
                self.config.sources.wikipedia_search_url.clone(),
            );
            let names: Vec<String> = channels.iter().map(|c| c.name.clone()).collect();
            let added =
                resolver::resolve_fallbacks(&mut logos, &names, &wikipedia, &self.normalizer)
                    .await;
            info!("Stage 4: {} fallback logos found", added);
            added
        };

        // Stage 5: persist the snapshot and the master playlist. The
        // asset index was already written during the stage 1 walk.
        info!("Stage 5: writing outputs");
        self.write_outputs(&logos, &channels)?;

        // Stage 6: inject into the caller's playlist, when given.
        if let Some((input, output)) = &options.inject {
            info!("Stage 6: injecting logos into {}", input.display());
            self.inject_file(input, output, &logos)?;
        }

        let summary = RunSummary {
            resolved_logos: logos.len(),
            fallback_logos,
            channels: channels.len(),
            skipped_sources,
        };
        info!(
            "Run complete: {} logos resolved ({} via fallback), {} channels, {} sources skipped",
            summary.resolved_logos,
            summary.fallback_logos,
            summary.channels,
            summary.skipped_sources.len()
        );

        Ok(summary)
    }

    fn write_outputs(&self, logos: &LogoMap, channels: &[ChannelRecord]) -> AppResult<()> {
        write_with_dirs(
            &self.config.storage.snapshot_path,
            serde_json::to_string_pretty(logos)?,
        )?;

        if !channels.is_empty() {
            let master = playlist::generate(channels, logos, &self.normalizer);
            write_with_dirs(&self.config.storage.master_playlist_path, master)?;
        }

        Ok(())
    }

    fn inject_file(&self, input: &Path, output: &Path, logos: &LogoMap) -> AppResult<()> {
        // Lossy decode: invalid bytes are replaced, never fatal.
        let bytes = std::fs::read(input)?;
        let text = String::from_utf8_lossy(&bytes);
        let injected = playlist::inject(&text, logos, &self.normalizer);
        write_with_dirs(output, injected)?;
        Ok(())
    }
}

fn write_with_dirs(path: &Path, contents: String) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
