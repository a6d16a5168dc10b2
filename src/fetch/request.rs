//! HTTP request building.

use url::Url;

use crate::config::{SEARCH_PATH, SEARCH_QUERY_PARAM};

/// Builds `<origin>/s?k=<keyword>` with the keyword URL-encoded.
///
/// # Errors
///
/// Returns a `url::ParseError` if the search path cannot be joined to `origin`.
pub fn build_search_url(origin: &Url, keyword: &str) -> Result<Url, url::ParseError> {
    let mut url = origin.join(SEARCH_PATH)?;
    url.query_pairs_mut()
        .clear()
        .append_pair(SEARCH_QUERY_PARAM, keyword);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_url_encodes_keyword() {
        let origin = Url::parse("https://www.amazon.com").unwrap();
        let url = build_search_url(&origin, "wireless mouse & pad").unwrap();
        assert_eq!(url.host_str(), Some("www.amazon.com"));
        assert_eq!(url.path(), "/s");
        let pairs: Vec<_> = url.query_pairs().collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "k");
        assert_eq!(pairs[0].1, "wireless mouse & pad");
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn test_build_search_url_ignores_origin_path_and_query() {
        let origin = Url::parse("http://127.0.0.1:8080/ignored?x=1").unwrap();
        let url = build_search_url(&origin, "mouse").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/s?k=mouse");
    }

    #[test]
    fn test_build_search_url_unicode_keyword() {
        let origin = Url::parse("https://www.amazon.com").unwrap();
        let url = build_search_url(&origin, "café").unwrap();
        assert_eq!(url.as_str(), "https://www.amazon.com/s?k=caf%C3%A9");
    }
}
