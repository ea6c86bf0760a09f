//! Logo injection into M3U playlist text
//!
//! Rewrites metadata lines to carry a `tvg-logo` attribute when the
//! channel's canonical key resolves in the logo map. Lines that
//! already carry a logo, lines whose key does not resolve, and every
//! non-metadata line are emitted byte-for-byte unchanged, which makes
//! injection idempotent: a second pass finds the attribute present and
//! leaves the line alone.

use super::ExtInfLine;
use crate::models::LogoMap;
use crate::utils::normalize::NameNormalizer;

/// Inject resolved logo references into playlist text.
///
/// Only metadata lines that gain a logo are re-serialized (with the
/// `tvg-logo` attribute inserted immediately after the duration
/// field); everything else, including line ordering and any CR line
/// endings, is preserved verbatim.
pub fn inject(text: &str, logos: &LogoMap, normalizer: &NameNormalizer) -> String {
    let mut out = Vec::new();

    for raw in text.split('\n') {
        let (line, cr) = match raw.strip_suffix('\r') {
            Some(stripped) => (stripped, "\r"),
            None => (raw, ""),
        };

        match inject_line(line, logos, normalizer) {
            Some(rewritten) => out.push(format!("{rewritten}{cr}")),
            None => out.push(raw.to_string()),
        }
    }

    out.join("\n")
}

/// Rewrite one line, or `None` to emit it unchanged.
fn inject_line(line: &str, logos: &LogoMap, normalizer: &NameNormalizer) -> Option<String> {
    if !line.starts_with("#EXTINF") {
        return None;
    }

    // Author-supplied logos always win; never overwrite or duplicate.
    if line.contains("tvg-logo=") {
        return None;
    }

    let mut parsed = ExtInfLine::parse(line)?;

    let key = normalizer.canonicalize(parsed.resolved_name());
    let reference = logos.get(&key)?;

    parsed.insert_attribute_front("tvg-logo", reference.as_str());
    Some(parsed.serialize())
}
