//! Wikipedia infobox fallback adapter
//!
//! Last-resort lookup for channels no curated source covered: run the
//! channel name through the free-text search endpoint and scrape the
//! first infobox image out of the returned page. Strictly best-effort:
//! every failure mode (network error, no article, no infobox, no
//! image) returns `None` with the reason logged, never an error.

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use super::FallbackLookup;
use crate::errors::SourceError;
use crate::fetch::HttpFetcher;
use crate::models::LogoReference;

pub struct WikipediaLogoSource {
    fetcher: HttpFetcher,
    search_url: String,
    infobox_image: Regex,
}

impl WikipediaLogoSource {
    /// `search_url` is the base of the free-text search endpoint, e.g.
    /// `https://en.wikipedia.org/w/index.php`.
    pub fn new(fetcher: HttpFetcher, search_url: String) -> Self {
        // First <img src="..."> inside an infobox table. The page is
        // scanned as text; a full HTML parse buys nothing here since
        // only the one attribute is wanted.
        let infobox_image = Regex::new(
            r#"(?s)<table[^>]*class="[^"]*infobox[^"]*".*?<img[^>]*\bsrc="([^"]+)""#,
        )
        .expect("infobox regex is valid");

        Self {
            fetcher,
            search_url,
            infobox_image,
        }
    }

    async fn try_lookup(&self, channel_name: &str) -> Result<Option<LogoReference>, SourceError> {
        let url = format!(
            "{}?search={}",
            self.search_url,
            urlencoding::encode(channel_name)
        );
        let html = self.fetcher.get_text(&url).await?;

        let Some(captures) = self.infobox_image.captures(&html) else {
            debug!("No infobox image for '{}'", channel_name);
            return Ok(None);
        };

        let src = &captures[1];
        Ok(Some(LogoReference::new(absolutize(src))))
    }
}

/// Wikipedia serves protocol-relative image URLs; pin them to https.
fn absolutize(src: &str) -> String {
    match src.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => src.to_string(),
    }
}

#[async_trait]
impl FallbackLookup for WikipediaLogoSource {
    async fn lookup(&self, channel_name: &str) -> Option<LogoReference> {
        let result = match self.try_lookup(channel_name).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Wikipedia lookup failed for '{}': {}", channel_name, e);
                None
            }
        };

        // Same politeness delay as the asset walk, applied after each
        // search request regardless of outcome.
        self.fetcher.pause().await;
        result
    }
}
