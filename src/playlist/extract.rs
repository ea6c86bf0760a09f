//! Channel extraction from M3U playlist text
//!
//! Produces the ordered list of channel records found in a playlist.
//! Lines that are neither metadata lines nor their paired stream URLs
//! (headers, comments, blanks) are simply not records; the injector is
//! responsible for carrying them through to output untouched.

use tracing::warn;

use super::ExtInfLine;
use crate::errors::PlaylistError;
use crate::models::ChannelRecord;

/// Extract channel records from playlist text, in source order.
///
/// A metadata line must be immediately followed by its stream URL; a
/// trailing metadata line at end-of-input, or one followed by another
/// directive or a blank line, is a malformed record and is dropped
/// with a warning. Callers are expected to have decoded the text
/// lossily, so invalid bytes never fail the parse.
pub fn extract(text: &str) -> Vec<ChannelRecord> {
    let lines: Vec<&str> = text.lines().collect();
    let mut records = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        if !line.starts_with("#EXTINF") {
            i += 1;
            continue;
        }

        let Some(parsed) = ExtInfLine::parse(line) else {
            warn!(
                "{}",
                PlaylistError::UnparseableLine {
                    line: line.to_string()
                }
            );
            i += 1;
            continue;
        };
        let name = parsed.resolved_name().to_string();

        let stream_url = match lines.get(i + 1).map(|l| l.trim()) {
            Some(next) if !next.is_empty() && !next.starts_with('#') => next.to_string(),
            _ => {
                warn!("{}", PlaylistError::MissingStreamUrl { name });
                i += 1;
                continue;
            }
        };

        records.push(ChannelRecord {
            name,
            stream_url,
            attributes: parsed.attributes,
            raw_line: line.to_string(),
        });
        i += 2;
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_pairs_in_source_order() {
        let text = "#EXTM3U\n\
                    #EXTINF:-1 tvg-name=\"ESPN HD\",ESPN HD\n\
                    http://stream/espn\n\
                    \n\
                    #EXTINF:-1,BBC One\n\
                    http://stream/bbc\n";
        let records = extract(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "ESPN HD");
        assert_eq!(records[0].stream_url, "http://stream/espn");
        assert_eq!(records[1].name, "BBC One");
        assert_eq!(records[1].stream_url, "http://stream/bbc");
    }

    #[test]
    fn tvg_name_takes_precedence_over_trailing_name() {
        let text = "#EXTINF:-1 tvg-name=\"Real Name\",Other Name\nhttp://stream/x\n";
        let records = extract(text);
        assert_eq!(records[0].name, "Real Name");
    }

    #[test]
    fn falls_back_to_text_after_last_comma() {
        let text = "#EXTINF:-1 group-title=\"News\",Sky News\nhttp://stream/sky\n";
        let records = extract(text);
        assert_eq!(records[0].name, "Sky News");
    }

    #[test]
    fn trailing_metadata_without_url_is_dropped() {
        let text = "#EXTINF:-1,First\nhttp://stream/1\n#EXTINF:-1,Orphan";
        let records = extract(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "First");
    }

    #[test]
    fn metadata_followed_by_directive_is_dropped() {
        let text = "#EXTINF:-1,Broken\n#EXTINF:-1,Valid\nhttp://stream/ok\n";
        let records = extract(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Valid");
    }

    #[test]
    fn headers_and_comments_are_not_records() {
        let text = "#EXTM3U\n# a comment\n\n#EXTINF:-1,Only\nhttp://stream/only\n";
        let records = extract(text);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn attributes_are_preserved_in_order() {
        let text = "#EXTINF:-1 tvg-id=\"x\" tvg-logo=\"l.png\",Name\nhttp://s\n";
        let records = extract(text);
        assert_eq!(
            records[0].attributes,
            vec![
                ("tvg-id".to_string(), "x".to_string()),
                ("tvg-logo".to_string(), "l.png".to_string()),
            ]
        );
    }
}
