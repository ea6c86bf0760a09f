//! Master playlist generation
//!
//! Builds a fresh playlist from aggregated channel records, stamping
//! each entry with its canonical key as `tvg-id` and the resolved logo
//! when one exists.

use std::collections::HashSet;

use super::ExtInfLine;
use crate::models::{ChannelRecord, LogoMap};
use crate::utils::normalize::NameNormalizer;

/// Generate playlist text from aggregated channels.
///
/// Channels without a stream URL are skipped (nothing to play, and an
/// emitted metadata line with no URL would be a malformed entry).
/// Channels are deduplicated by canonical key, first seen wins;
/// channels whose name yields an unmatched key are kept (they cannot
/// collide through the empty key, so each is emitted).
pub fn generate(channels: &[ChannelRecord], logos: &LogoMap, normalizer: &NameNormalizer) -> String {
    let mut lines = vec!["#EXTM3U".to_string()];
    let mut seen = HashSet::new();

    for channel in channels {
        if channel.stream_url.is_empty() {
            continue;
        }

        let key = normalizer.canonicalize(&channel.name);
        if !key.is_unmatched() && !seen.insert(key.clone()) {
            continue;
        }

        let mut line = ExtInfLine {
            duration: "-1".to_string(),
            attributes: Vec::new(),
            trailing_name: channel.name.clone(),
        };
        if !key.is_unmatched() {
            line.attributes
                .push(("tvg-id".to_string(), key.to_string()));
        }
        line.attributes
            .push(("tvg-name".to_string(), channel.name.clone()));
        if let Some(reference) = logos.get(&key) {
            line.attributes
                .push(("tvg-logo".to_string(), reference.to_string()));
        }

        lines.push(line.serialize());
        lines.push(channel.stream_url.clone());
    }

    lines.push(String::new());
    lines.join("\n")
}
