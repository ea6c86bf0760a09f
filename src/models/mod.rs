//! Core data model for channel and logo aggregation
//!
//! The join key across every source is the [`CanonicalKey`] produced by
//! the name normalizer. Each source adapter yields a [`LogoMap`] keyed
//! by it; the resolver merges those partial maps under a fixed
//! precedence into the single map consumed by playlist injection.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Canonical lookup key derived deterministically from a channel name.
///
/// An empty key means the source name carried no usable signal
/// (empty or whitespace-only input, or a name consumed entirely by
/// the strip rules). Empty keys are "unmatched": they must never be
/// inserted into a [`LogoMap`] and never used for lookups, so that
/// unrelated channels cannot end up sharing a logo through the empty
/// string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this key cannot participate in any join.
    pub fn is_unmatched(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A logo location: either a remote URL or a local raster file path.
///
/// Immutable once produced by a source adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogoReference(String);

impl LogoReference {
    pub fn new<S: Into<String>>(reference: S) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from canonical key to logo reference.
///
/// A `BTreeMap` keeps the serialized snapshot deterministic across
/// runs. Unmatched (empty) keys are rejected at the insertion
/// boundary rather than policed by every caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogoMap {
    entries: BTreeMap<CanonicalKey, LogoReference>,
}

impl LogoMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unconditionally (last-writer-wins). Used while building a
    /// single source's partial map. Unmatched keys are dropped.
    pub fn insert(&mut self, key: CanonicalKey, reference: LogoReference) {
        if key.is_unmatched() {
            return;
        }
        self.entries.insert(key, reference);
    }

    /// Insert only when the key is absent (first-writer-wins). Used by
    /// the merger when applying sources in priority order.
    pub fn insert_if_absent(&mut self, key: CanonicalKey, reference: LogoReference) {
        if key.is_unmatched() {
            return;
        }
        self.entries.entry(key).or_insert(reference);
    }

    pub fn get(&self, key: &CanonicalKey) -> Option<&LogoReference> {
        if key.is_unmatched() {
            return None;
        }
        self.entries.get(key)
    }

    pub fn contains(&self, key: &CanonicalKey) -> bool {
        !key.is_unmatched() && self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, CanonicalKey, LogoReference> {
        self.entries.iter()
    }
}

impl IntoIterator for LogoMap {
    type Item = (CanonicalKey, LogoReference);
    type IntoIter = btree_map::IntoIter<CanonicalKey, LogoReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(CanonicalKey, LogoReference)> for LogoMap {
    fn from_iter<I: IntoIterator<Item = (CanonicalKey, LogoReference)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, reference) in iter {
            map.insert(key, reference);
        }
        map
    }
}

/// One playlist entry as produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    /// Display name (tvg-name attribute, else the text after the last
    /// unquoted comma of the metadata line)
    pub name: String,
    /// Stream URL from the line following the metadata line
    pub stream_url: String,
    /// Attributes embedded in the metadata line, in source order
    pub attributes: Vec<(String, String)>,
    /// Original metadata line, kept to detect pre-existing logo
    /// attributes and avoid duplication
    pub raw_line: String,
}

/// Outcome of one source adapter run.
///
/// Adapters never fail the run: an unreachable or malformed source
/// yields an empty `logos` map with `skipped` describing why.
#[derive(Debug)]
pub struct SourceReport {
    /// Human-readable source name for logging and the run summary
    pub source: String,
    /// Partial key-to-logo mapping contributed by this source
    pub logos: LogoMap,
    /// Present when the source was skipped entirely
    pub skipped: Option<String>,
}

impl SourceReport {
    pub fn resolved(source: impl Into<String>, logos: LogoMap) -> Self {
        Self {
            source: source.into(),
            logos,
            skipped: None,
        }
    }

    pub fn skipped(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            logos: LogoMap::new(),
            skipped: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_key_is_never_inserted() {
        let mut map = LogoMap::new();
        map.insert(CanonicalKey::new(""), LogoReference::new("a.png"));
        map.insert_if_absent(CanonicalKey::new(""), LogoReference::new("b.png"));
        assert!(map.is_empty());
        assert!(!map.contains(&CanonicalKey::new("")));
        assert_eq!(map.get(&CanonicalKey::new("")), None);
    }

    #[test]
    fn insert_if_absent_keeps_first_writer() {
        let mut map = LogoMap::new();
        map.insert_if_absent(CanonicalKey::new("espn"), LogoReference::new("a.png"));
        map.insert_if_absent(CanonicalKey::new("espn"), LogoReference::new("b.png"));
        assert_eq!(
            map.get(&CanonicalKey::new("espn")),
            Some(&LogoReference::new("a.png"))
        );
    }

    #[test]
    fn insert_is_last_writer_wins() {
        let mut map = LogoMap::new();
        map.insert(CanonicalKey::new("espn"), LogoReference::new("a.png"));
        map.insert(CanonicalKey::new("espn"), LogoReference::new("b.png"));
        assert_eq!(
            map.get(&CanonicalKey::new("espn")),
            Some(&LogoReference::new("b.png"))
        );
    }

    #[test]
    fn snapshot_serialization_is_a_plain_object() {
        let mut map = LogoMap::new();
        map.insert(CanonicalKey::new("espn"), LogoReference::new("espn.png"));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"espn":"espn.png"}"#);
    }
}
