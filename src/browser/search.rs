use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::error::ScrapeError;

// Characters left as-is by JavaScript's encodeURIComponent
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Builds `<search_url>?q=<query>` with the query component-encoded.
pub fn build_search_url(search_url: &str, query: &str) -> Result<Url, ScrapeError> {
    let encoded = utf8_percent_encode(query, QUERY_COMPONENT).to_string();
    let separator = if search_url.contains('?') { '&' } else { '?' };

    Url::parse(&format!("{}{}q={}", search_url, separator, encoded))
        .map_err(|_| ScrapeError::InvalidUrl(search_url.to_string()))
}
