//! m3u-logoweave: channel logo aggregation for M3U playlists
//!
//! Aggregates television channel logos from several public sources (a
//! curated logo asset repository, JSON channel indexes, Wikipedia
//! infobox scraping), joins them to channel names through a canonical
//! normalized key, and injects the resolved logo URLs into M3U/M3U8
//! playlists.

pub mod assets;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod playlist;
pub mod resolver;
pub mod sources;
pub mod utils;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use models::{CanonicalKey, ChannelRecord, LogoMap, LogoReference};
pub use utils::normalize::{NameNormalizer, NormalizationRules};
