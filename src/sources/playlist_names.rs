//! Embedded-playlist adapter
//!
//! Pulls channel records out of remote M3U documents. This source
//! supplies no logos; its job is discovery: the distinct channels it
//! returns are cross-referenced against the merged logo map to decide
//! which names still need a fallback lookup, and they feed the master
//! playlist. Per-URL failures degrade that URL to nothing.

use tracing::{info, warn};

use crate::fetch::HttpFetcher;
use crate::models::ChannelRecord;
use crate::playlist;
use crate::utils::normalize::NameNormalizer;

pub struct PlaylistNameSource {
    fetcher: HttpFetcher,
    normalizer: NameNormalizer,
    urls: Vec<String>,
}

impl PlaylistNameSource {
    pub fn new(fetcher: HttpFetcher, normalizer: NameNormalizer, urls: Vec<String>) -> Self {
        Self {
            fetcher,
            normalizer,
            urls,
        }
    }

    /// Fetch every configured playlist and return its channels,
    /// deduplicated by canonical key in order of first appearance.
    /// Channels with unmatched keys are kept as-is.
    pub async fn channels(&self) -> Vec<ChannelRecord> {
        let mut seen = std::collections::HashSet::new();
        let mut channels = Vec::new();

        for url in &self.urls {
            let text = match self.fetcher.get_text(url).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping playlist source {}: {}", url, e);
                    continue;
                }
            };

            let mut added = 0usize;
            for record in playlist::extract(&text) {
                let key = self.normalizer.canonicalize(&record.name);
                if !key.is_unmatched() && !seen.insert(key) {
                    continue;
                }
                channels.push(record);
                added += 1;
            }
            info!("Playlist source {}: {} distinct channels", url, added);
        }

        channels
    }
}
