//! Catalog search-page price extraction.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://amemoba.com";

/// The first `.price`-classed tag or `<bdi>` body, where the catalog theme
/// renders the listing price.
static PRICE_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<(?:span[^>]*class="[^"]*price[^"]*"|bdi)[^>]*>(.*?)</"#).unwrap()
});

/// A price figure with optional thousands separators.
static PRICE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9][0-9,]*").unwrap());

pub struct PriceClient {
    client: reqwest::Client,
    base_url: String,
}

impl PriceClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Fetch the catalog search page for a model query and pull the first
    /// listed price. `None` means the page had no recognizable price.
    pub async fn fetch_reference_price(&self, query: &str) -> Result<Option<u64>> {
        let url = format!("{}/?s={}", self.base_url, urlencoding::encode(query));
        debug!(query, %url, "Fetching reference price");
        let html = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch catalog search page")?
            .text()
            .await
            .context("Failed to read catalog search page")?;
        Ok(extract_price(&html))
    }
}

/// Scan raw catalog HTML for the first price figure.
pub fn extract_price(html: &str) -> Option<u64> {
    let tag_body = PRICE_TAG_RE.captures(html)?.get(1)?.as_str();
    let figure = PRICE_NUMBER_RE.find(tag_body)?.as_str().replace(',', "");
    figure.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_first_price_tag() {
        let html = r#"
            <div class="product">
              <span class="price"><bdi>&yen;51,000</bdi></span>
              <span class="price"><bdi>&yen;48,000</bdi></span>
            </div>"#;
        assert_eq!(extract_price(html), Some(51000));
    }

    #[test]
    fn falls_back_to_a_bare_bdi_tag() {
        let html = "<p><bdi>12,800 yen</bdi></p>";
        assert_eq!(extract_price(html), Some(12800));
    }

    #[test]
    fn ignores_pages_without_prices() {
        assert_eq!(extract_price("<html><body>no results</body></html>"), None);
        assert_eq!(extract_price(r#"<span class="price">TBD</span>"#), None);
    }
}
