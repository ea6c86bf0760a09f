//! Logo source adapters
//!
//! Each adapter turns one external source into a partial canonical-key
//! to logo-reference map. Adapters are infallible at their boundary: a
//! source being unreachable or malformed is logged and degrades to an
//! empty [`SourceReport`], never an error the pipeline has to handle.
//!
//! Priority across adapters is fixed by the pipeline: asset-directory
//! logos first, then JSON indexes in configured order, then the
//! Wikipedia fallback for whatever is still missing.

pub mod asset_directory;
pub mod json_index;
pub mod playlist_names;
pub mod wikipedia;

use async_trait::async_trait;

use crate::models::{LogoReference, SourceReport};

pub use asset_directory::AssetDirectorySource;
pub use json_index::JsonIndexSource;
pub use playlist_names::PlaylistNameSource;
pub use wikipedia::WikipediaLogoSource;

/// Capability shared by the bulk adapters: produce a partial logo map.
#[async_trait]
pub trait LogoSource: Send + Sync {
    /// Human-readable source name, used in logs and the run summary.
    fn name(&self) -> &str;

    /// Produce this source's partial map. Never fails: degraded
    /// sources return an empty map with a skip reason.
    async fn produce(&self) -> SourceReport;
}

/// Capability of the per-channel fallback: look up a single name.
///
/// Returns `None` on any failure (network error, no result, no
/// infobox image); the reason is logged at the adapter, not raised.
#[async_trait]
pub trait FallbackLookup: Send + Sync {
    async fn lookup(&self, channel_name: &str) -> Option<LogoReference>;
}
