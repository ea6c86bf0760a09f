//! Error type definitions for the logo aggregation pipeline
//!
//! This module defines all error types used throughout the application,
//! providing a hierarchical error system that makes debugging and error
//! handling more straightforward. The guiding rule is that no single
//! source or single playlist record may fail the run: source errors are
//! captured at the adapter boundary and degrade that source to an empty
//! result, while only output-write failures are fatal.

use thiserror::Error;

/// Convenience result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Top-level application error type
///
/// This enum represents all possible errors that can occur in the
/// application. It uses `thiserror` to provide automatic error trait
/// implementations and proper error chaining.
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Playlist parsing errors
    #[error("Playlist error: {0}")]
    Playlist(#[from] PlaylistError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem errors (fatal when writing required outputs)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors for snapshot/index files
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Source adapter specific errors
///
/// These never propagate past a source adapter: the adapter logs the
/// failure and yields an empty partial map instead.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network or HTTP failure for an entire source
    #[error("Source unavailable: {url} - {message}")]
    Unavailable { url: String, message: String },

    /// A single document could not be parsed; other documents continue
    #[error("Malformed source: {url} - {message}")]
    Malformed { url: String, message: String },

    /// Rasterization failure for one asset; that asset is skipped
    #[error("Conversion failed: {asset} - {message}")]
    Conversion { asset: String, message: String },

    /// Non-success HTTP status from an external source
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },
}

/// Playlist parsing specific errors
#[derive(Error, Debug)]
pub enum PlaylistError {
    /// A metadata line with no following stream URL; the record is dropped
    #[error("Missing stream URL for channel: {name}")]
    MissingStreamUrl { name: String },

    /// A metadata line that does not match the EXTINF grammar
    #[error("Unparseable metadata line: {line}")]
    UnparseableLine { line: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error with a custom message
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Create an unavailable error for a source URL
    pub fn unavailable<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Unavailable {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed source error
    pub fn malformed<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Malformed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a conversion failure for a single asset
    pub fn conversion<A: Into<String>, M: Into<String>>(asset: A, message: M) -> Self {
        Self::Conversion {
            asset: asset.into(),
            message: message.into(),
        }
    }
}
