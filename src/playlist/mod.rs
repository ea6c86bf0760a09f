//! M3U playlist handling
//!
//! Grammar recognized:
//!
//! ```text
//! #EXTINF:<duration> [attr="value"]... ,<display name>
//! <stream url>
//! ```
//!
//! The metadata line is parsed into a structured [`ExtInfLine`]
//! (duration, ordered attribute list, trailing display name) and
//! re-serialized deterministically, instead of being rewritten with
//! string splicing. All other lines pass through verbatim.

pub mod extract;
pub mod generate;
pub mod inject;

pub use extract::extract;
pub use generate::generate;
pub use inject::inject;

/// Structured form of an `#EXTINF` metadata line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtInfLine {
    /// Duration field as written (commonly `-1` for live streams)
    pub duration: String,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    /// Text after the comma terminating the attribute region, verbatim
    pub trailing_name: String,
}

impl ExtInfLine {
    /// Parse a metadata line. Returns `None` when the line does not
    /// match the EXTINF grammar (missing prefix or no terminating
    /// comma before the display name).
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix("#EXTINF:")?;

        let mut duration_end = rest.len();
        for (i, c) in rest.char_indices() {
            if c.is_whitespace() || c == ',' {
                duration_end = i;
                break;
            }
        }
        let duration = rest[..duration_end].to_string();
        let after_duration = &rest[duration_end..];

        if let Some(name) = after_duration.strip_prefix(',') {
            // No attribute region
            return Some(Self {
                duration,
                attributes: Vec::new(),
                trailing_name: name.to_string(),
            });
        }

        // Attribute region runs until the first comma outside quotes;
        // the remainder is the display name (which may itself contain
        // commas).
        let mut in_quotes = false;
        let mut split_at = None;
        for (i, c) in after_duration.char_indices() {
            match c {
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => {
                    split_at = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let split_at = split_at?;

        let attributes = parse_attributes(&after_duration[..split_at]);
        let trailing_name = after_duration[split_at + 1..].to_string();

        Some(Self {
            duration,
            attributes,
            trailing_name,
        })
    }

    /// Serialize back to a metadata line. The output is deterministic:
    /// duration, attributes in list order (one space apart), a comma,
    /// then the display name exactly as parsed.
    pub fn serialize(&self) -> String {
        let mut line = format!("#EXTINF:{}", self.duration);
        for (key, value) in &self.attributes {
            line.push_str(&format!(" {}=\"{}\"", key, value));
        }
        line.push(',');
        line.push_str(&self.trailing_name);
        line
    }

    /// Look up an attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    /// Insert an attribute at the front of the list (immediately after
    /// the duration field when serialized).
    pub fn insert_attribute_front(&mut self, key: &str, value: &str) {
        self.attributes
            .insert(0, (key.to_string(), value.to_string()));
    }

    /// Display name under the documented precedence: the `tvg-name`
    /// attribute when present, otherwise the trailing text after the
    /// last comma.
    pub fn resolved_name(&self) -> &str {
        self.attribute("tvg-name")
            .unwrap_or_else(|| self.trailing_name.trim())
    }
}

/// Parse the attribute region of a metadata line into ordered
/// key/value pairs. Quoted values may contain spaces and escaped
/// characters; unparseable fragments are dropped rather than failing
/// the line.
fn parse_attributes(region: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut rest = region;

    loop {
        rest = rest.trim_start();
        let Some(eq) = rest.find('=') else { break };
        let key = rest[..eq].trim();
        rest = &rest[eq + 1..];

        let value = if let Some(body) = rest.strip_prefix('"') {
            match closing_quote(body) {
                Some(end) => {
                    rest = &body[end + 1..];
                    &body[..end]
                }
                None => {
                    // Unterminated quote: the remainder is the value.
                    let value = body;
                    rest = "";
                    value
                }
            }
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let value = &rest[..end];
            rest = &rest[end..];
            value
        };

        if !key.is_empty() && !value.is_empty() {
            attrs.push((key.to_string(), unescape(value)));
        }
    }

    attrs
}

/// Byte index of the first unescaped `"` in a quoted value body.
fn closing_quote(body: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(i),
            _ => escaped = false,
        }
    }
    None
}

fn unescape(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_duration_attributes_and_name() {
        let line = ExtInfLine::parse(
            r#"#EXTINF:-1 tvg-id="espn" tvg-name="ESPN HD" group-title="Sports",ESPN HD"#,
        )
        .unwrap();
        assert_eq!(line.duration, "-1");
        assert_eq!(
            line.attributes,
            vec![
                ("tvg-id".to_string(), "espn".to_string()),
                ("tvg-name".to_string(), "ESPN HD".to_string()),
                ("group-title".to_string(), "Sports".to_string()),
            ]
        );
        assert_eq!(line.trailing_name, "ESPN HD");
    }

    #[test]
    fn parses_line_without_attributes() {
        let line = ExtInfLine::parse("#EXTINF:-1,BBC One").unwrap();
        assert_eq!(line.duration, "-1");
        assert!(line.attributes.is_empty());
        assert_eq!(line.trailing_name, "BBC One");
    }

    #[test]
    fn quoted_comma_does_not_end_attribute_region() {
        let line =
            ExtInfLine::parse(r#"#EXTINF:0 tvg-name="News, Weather",News and Weather"#).unwrap();
        assert_eq!(line.attribute("tvg-name"), Some("News, Weather"));
        assert_eq!(line.trailing_name, "News and Weather");
    }

    #[test]
    fn display_name_may_contain_commas() {
        let line = ExtInfLine::parse("#EXTINF:-1,News, Weather and Sport").unwrap();
        assert_eq!(line.trailing_name, "News, Weather and Sport");
    }

    #[test]
    fn rejects_lines_without_display_name_separator() {
        assert!(ExtInfLine::parse("#EXTINF:-1 tvg-id=\"x\"").is_none());
        assert!(ExtInfLine::parse("#EXTM3U").is_none());
    }

    #[test]
    fn serialize_round_trips_well_formed_lines() {
        let raw = r#"#EXTINF:-1 tvg-id="espn" tvg-name="ESPN HD",ESPN HD"#;
        let line = ExtInfLine::parse(raw).unwrap();
        assert_eq!(line.serialize(), raw);
    }

    #[test]
    fn insert_attribute_front_lands_after_duration() {
        let mut line = ExtInfLine::parse(r#"#EXTINF:-1 tvg-name="ESPN HD",ESPN HD"#).unwrap();
        line.insert_attribute_front("tvg-logo", "http://logo/espn.png");
        assert_eq!(
            line.serialize(),
            r#"#EXTINF:-1 tvg-logo="http://logo/espn.png" tvg-name="ESPN HD",ESPN HD"#
        );
    }

    #[test]
    fn resolved_name_prefers_tvg_name() {
        let line = ExtInfLine::parse(r#"#EXTINF:-1 tvg-name="ESPN HD",Fallback"#).unwrap();
        assert_eq!(line.resolved_name(), "ESPN HD");

        let line = ExtInfLine::parse("#EXTINF:-1, Fallback Name ").unwrap();
        assert_eq!(line.resolved_name(), "Fallback Name");
    }

    #[test]
    fn escaped_quote_stays_inside_value() {
        let attrs = parse_attributes(r#"tvg-name="The \"One\"" group-title="News""#);
        assert_eq!(
            attrs,
            vec![
                ("tvg-name".to_string(), r#"The "One""#.to_string()),
                ("group-title".to_string(), "News".to_string()),
            ]
        );
    }

    #[test]
    fn unterminated_quote_takes_remainder() {
        let attrs = parse_attributes(r#"tvg-id="espn" tvg-name="ESPN HD"#);
        assert_eq!(
            attrs,
            vec![
                ("tvg-id".to_string(), "espn".to_string()),
                ("tvg-name".to_string(), "ESPN HD".to_string()),
            ]
        );
    }

    #[test]
    fn unquoted_values_and_empty_pairs() {
        let attrs = parse_attributes(r#"tvg-shift=2 tvg-id="" group-title="Kids""#);
        assert_eq!(
            attrs,
            vec![
                ("tvg-shift".to_string(), "2".to_string()),
                ("group-title".to_string(), "Kids".to_string()),
            ]
        );
    }

    #[test]
    fn fractional_duration_is_preserved() {
        let line = ExtInfLine::parse("#EXTINF:10.5,Clip").unwrap();
        assert_eq!(line.duration, "10.5");
        assert_eq!(line.serialize(), "#EXTINF:10.5,Clip");
    }
}
