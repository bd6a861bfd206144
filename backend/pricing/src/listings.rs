//! Secondary listings-site search links.
//!
//! The listings site blocks automated scraping, so the backend only builds
//! the search URL for the operator to open; the quote fields stay as
//! placeholders until filled in by hand.

use serde::Serialize;

const LISTINGS_SEARCH_URL: &str = "https://buy.geo-online.co.jp/search/";

/// Placeholder shown until the operator fills in a quote.
const UNQUOTED: &str = "—";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSearch {
    pub url: String,
    pub unused: String,
    pub used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
}

/// Build the listings-site search link for a model prefix.
pub fn listing_search(model_prefix: &str, carrier: Option<&str>) -> ListingSearch {
    ListingSearch {
        url: format!("{LISTINGS_SEARCH_URL}?q={}", urlencoding::encode(model_prefix)),
        unused: UNQUOTED.to_string(),
        used: UNQUOTED.to_string(),
        carrier: carrier.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_an_encoded_search_url() {
        let search = listing_search("MLJH3 J/A", Some("docomo"));
        assert_eq!(search.url, "https://buy.geo-online.co.jp/search/?q=MLJH3%20J%2FA");
        assert_eq!(search.carrier.as_deref(), Some("docomo"));
        assert_eq!(search.unused, "—");
    }
}
