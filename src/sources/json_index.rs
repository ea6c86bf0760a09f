//! JSON channel-index adapter
//!
//! Fetches one or more JSON documents, each an array of channel
//! records. Field names vary between indexes (`name` vs `channel` for
//! the display name, `logo` vs `url` for the logo reference), so
//! records are inspected as raw values instead of a fixed schema.
//! Records missing either field are skipped; a malformed document is
//! skipped while the remaining documents still contribute. Documents
//! are themselves prioritized in configured order: a key claimed by an
//! earlier document is not overwritten by a later one.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::LogoSource;
use crate::fetch::HttpFetcher;
use crate::models::{ChannelRecord, LogoMap, LogoReference, SourceReport};
use crate::utils::normalize::NameNormalizer;

pub struct JsonIndexSource {
    fetcher: HttpFetcher,
    normalizer: NameNormalizer,
    urls: Vec<String>,
}

/// Everything one pass over the index documents yields: the partial
/// logo map, plus the channel records (entries that also carry a
/// stream URL) used for master-playlist generation and fallback
/// discovery.
#[derive(Debug, Default)]
pub struct JsonIndexCollection {
    pub logos: LogoMap,
    pub channels: Vec<ChannelRecord>,
}

impl JsonIndexCollection {
    /// Classify the collection into a source report plus the channel
    /// records. A collection with neither logos nor channels means
    /// every document failed, so the source counts as skipped.
    pub fn into_parts(self, source_name: &str) -> (SourceReport, Vec<ChannelRecord>) {
        let report = if self.logos.is_empty() && self.channels.is_empty() {
            SourceReport::skipped(source_name, "no index document yielded any records")
        } else {
            SourceReport::resolved(source_name, self.logos)
        };
        (report, self.channels)
    }
}

impl JsonIndexSource {
    pub fn new(fetcher: HttpFetcher, normalizer: NameNormalizer, urls: Vec<String>) -> Self {
        Self {
            fetcher,
            normalizer,
            urls,
        }
    }

    /// Fetch and scan every configured index document. Per-document
    /// failures are logged and skipped.
    pub async fn collect(&self) -> JsonIndexCollection {
        let mut collection = JsonIndexCollection::default();

        for url in &self.urls {
            match self.fetcher.get_json::<Value>(url).await {
                Ok(document) => self.scan_document(url, &document, &mut collection),
                Err(e) => warn!("Skipping JSON index {}: {}", url, e),
            }
        }

        collection
    }

    fn scan_document(&self, url: &str, document: &Value, out: &mut JsonIndexCollection) {
        let Some(records) = document.as_array() else {
            warn!("Skipping JSON index {}: not an array of records", url);
            return;
        };

        // Last record wins within a document, first document wins
        // across documents.
        let mut document_logos = LogoMap::new();
        let mut channels = 0usize;

        for record in records {
            let Some(name) = field_str(record, &["name", "channel"]) else {
                continue;
            };

            if let Some(logo) = field_str(record, &["logo", "url"]) {
                document_logos.insert(
                    self.normalizer.canonicalize(name),
                    LogoReference::new(logo),
                );
            }

            if let Some(stream_url) = field_str(record, &["url"]) {
                out.channels.push(ChannelRecord {
                    name: name.to_string(),
                    stream_url: stream_url.to_string(),
                    attributes: Vec::new(),
                    raw_line: String::new(),
                });
                channels += 1;
            }
        }

        debug!(
            "JSON index {}: {} logos, {} channels",
            url,
            document_logos.len(),
            channels
        );

        for (key, reference) in document_logos {
            out.logos.insert_if_absent(key, reference);
        }
    }
}

/// First present, non-empty string field among the candidates.
fn field_str<'a>(record: &'a Value, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|field| record.get(*field))
        .filter_map(Value::as_str)
        .find(|value| !value.is_empty())
}

#[async_trait]
impl LogoSource for JsonIndexSource {
    fn name(&self) -> &str {
        "json-index"
    }

    async fn produce(&self) -> SourceReport {
        let (report, _) = self.collect().await.into_parts(self.name());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CanonicalKey;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(urls: Vec<String>) -> JsonIndexSource {
        let fetcher = HttpFetcher::new(
            Duration::from_secs(5),
            Duration::ZERO,
            "m3u-logoweave-test",
        );
        JsonIndexSource::new(fetcher, NameNormalizer::default(), urls)
    }

    #[test]
    fn field_lookup_prefers_earlier_candidates() {
        let record: Value = serde_json::json!({"logo": "a.png", "url": "http://stream"});
        assert_eq!(field_str(&record, &["logo", "url"]), Some("a.png"));
        assert_eq!(field_str(&record, &["name", "channel"]), None);
    }

    #[tokio::test]
    async fn accepts_both_field_spellings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"channel": "BBC One", "url": "http://logos/bbc-a.png"}]"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"name": "BBC One", "logo": "http://logos/bbc-b.png"}]"#,
            ))
            .mount(&server)
            .await;

        let source = source(vec![
            format!("{}/a.json", server.uri()),
            format!("{}/b.json", server.uri()),
        ]);
        let collection = source.collect().await;

        // First-listed document claimed the key.
        assert_eq!(
            collection.logos.get(&CanonicalKey::new("bbcone")).unwrap().as_str(),
            "http://logos/bbc-a.png"
        );
    }

    #[tokio::test]
    async fn records_missing_fields_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[
                    {"name": "No Logo Here"},
                    {"logo": "http://logos/orphan.png"},
                    {"name": "ESPN", "logo": "http://logos/espn.png"}
                ]"#,
            ))
            .mount(&server)
            .await;

        let collection = source(vec![format!("{}/channels.json", server.uri())])
            .collect()
            .await;
        assert_eq!(collection.logos.len(), 1);
        assert!(collection.logos.contains(&CanonicalKey::new("espn")));
    }

    #[tokio::test]
    async fn malformed_document_does_not_block_others() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bad.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/good.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"name": "ESPN", "logo": "http://logos/espn.png"}]"#,
            ))
            .mount(&server)
            .await;

        let collection = source(vec![
            format!("{}/bad.json", server.uri()),
            format!("{}/good.json", server.uri()),
        ])
        .collect()
        .await;
        assert_eq!(collection.logos.len(), 1);
    }

    #[tokio::test]
    async fn unreachable_source_degrades_to_skipped_report() {
        let source = source(vec!["http://127.0.0.1:9/channels.json".to_string()]);
        let report = source.produce().await;
        assert!(report.logos.is_empty());
        assert!(report.skipped.is_some());
    }

    #[tokio::test]
    async fn records_with_stream_urls_become_channels() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"name": "ESPN", "logo": "http://logos/espn.png", "url": "http://stream/espn"}]"#,
            ))
            .mount(&server)
            .await;

        let collection = source(vec![format!("{}/channels.json", server.uri())])
            .collect()
            .await;
        assert_eq!(collection.channels.len(), 1);
        assert_eq!(collection.channels[0].stream_url, "http://stream/espn");
    }
}
