//! Logo resolution: merging source maps and gating the fallback
//!
//! Merge policy is first-writer-wins over a fixed priority order:
//! asset-derived logos first, then the JSON indexes in configured
//! order, with the scraped fallback last. A key claimed by an earlier
//! source is never overwritten, and the fallback is only ever
//! consulted for keys still absent after every higher-priority source
//! has contributed (per-channel gate, not a blanket merge step).

use tracing::{debug, info};

use crate::models::{LogoMap, SourceReport};
use crate::sources::FallbackLookup;
use crate::utils::normalize::NameNormalizer;

/// Merge partial maps in priority order, first writer wins.
///
/// Pure in its inputs: the result depends only on the maps and their
/// order, so repeated runs over identical source snapshots are
/// deterministic. Unmatched keys never enter the result.
pub fn merge<I>(reports: I) -> LogoMap
where
    I: IntoIterator<Item = LogoMap>,
{
    let mut merged = LogoMap::new();
    for partial in reports {
        for (key, reference) in partial {
            merged.insert_if_absent(key, reference);
        }
    }
    merged
}

/// Merge full source reports, logging skipped sources, and return the
/// names of the skipped ones for the run summary.
pub fn merge_reports(reports: Vec<SourceReport>) -> (LogoMap, Vec<String>) {
    let mut skipped = Vec::new();
    let mut maps = Vec::new();

    for report in reports {
        if let Some(reason) = &report.skipped {
            info!("Source '{}' skipped: {}", report.source, reason);
            skipped.push(report.source.clone());
        }
        maps.push(report.logos);
    }

    (merge(maps), skipped)
}

/// Fill remaining gaps through the per-channel fallback.
///
/// Only names whose canonical key is valid and still unresolved reach
/// the fallback; everything already claimed by a higher-priority
/// source is never looked up. Returns the number of logos added.
pub async fn resolve_fallbacks<F: FallbackLookup + ?Sized>(
    logos: &mut LogoMap,
    channel_names: &[String],
    fallback: &F,
    normalizer: &NameNormalizer,
) -> usize {
    let mut added = 0usize;

    for name in channel_names {
        let key = normalizer.canonicalize(name);
        if key.is_unmatched() || logos.contains(&key) {
            continue;
        }

        if let Some(reference) = fallback.lookup(name).await {
            debug!("Fallback logo found for '{}'", name);
            logos.insert_if_absent(key, reference);
            added += 1;
        }
    }

    added
}
