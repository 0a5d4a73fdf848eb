//! Range Selection
//!
//! The `range` token picks a backend-defined date window. It is read from
//! the page URL and forwarded unmodified.

use reqwest::Url;
use std::fmt;

/// Origin used to resolve relative page URLs
const PAGE_BASE: &str = "http://localhost/";

/// Default token when the page URL carries no `range` parameter
pub const DEFAULT_RANGE: &str = "last_week";

/// Opaque date-window token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeSelector(String);

impl RangeSelector {
    /// Seven days back to end of today
    pub const LAST_WEEK: &'static str = "last_week";
    /// Thirty days back to end of today
    pub const LAST_MONTH: &'static str = "last_month";
    /// No bound. The backend also treats unknown tokens this way.
    pub const ALL_TIME: &'static str = "all_time";

    /// Wrap a token as-is. No validation is done here.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read `range` from a query string (with or without the leading `?`).
    ///
    /// The first occurrence wins. A missing or empty value falls back to
    /// `last_week`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        match Url::parse(PAGE_BASE) {
            Ok(mut url) => {
                url.set_query(Some(query));
                Self::from_url(&url)
            }
            Err(_) => Self::default(),
        }
    }

    /// Read `range` from a page URL. Relative URLs resolve against a
    /// placeholder origin; the fragment is never searched.
    pub fn from_page_url(page_url: &str) -> Self {
        let base = Url::parse(PAGE_BASE).ok();
        Url::options()
            .base_url(base.as_ref())
            .parse(page_url)
            .map(|url| Self::from_url(&url))
            .unwrap_or_default()
    }

    fn from_url(url: &Url) -> Self {
        url.query_pairs()
            .find(|(key, _)| key == "range")
            .map(|(_, value)| value.into_owned())
            .filter(|token| !token.is_empty())
            .map(Self)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the tokens the Healthsome backend recognises
    pub fn is_known(&self) -> bool {
        matches!(
            self.0.as_str(),
            Self::LAST_WEEK | Self::LAST_MONTH | Self::ALL_TIME
        )
    }

    /// Build `<endpoint>?range=<token>`
    pub fn request_path(&self, endpoint: &str) -> String {
        format!("{}?range={}", endpoint, urlencoding::encode(&self.0))
    }
}

impl Default for RangeSelector {
    fn default() -> Self {
        Self(DEFAULT_RANGE.to_string())
    }
}

impl fmt::Display for RangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RangeSelector {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_range_defaults_to_last_week() {
        assert_eq!(RangeSelector::from_query("").as_str(), "last_week");
        assert_eq!(RangeSelector::from_query("?foo=bar").as_str(), "last_week");
        assert_eq!(RangeSelector::from_query("range=").as_str(), "last_week");
        assert_eq!(
            RangeSelector::from_page_url("http://localhost/weight/").as_str(),
            "last_week"
        );
    }

    #[test]
    fn test_range_read_from_query() {
        assert_eq!(
            RangeSelector::from_query("?range=last_month").as_str(),
            "last_month"
        );
        assert_eq!(
            RangeSelector::from_query("a=1&range=all_time&range=last_week").as_str(),
            "all_time"
        );
        assert_eq!(
            RangeSelector::from_page_url("http://h/bp/?x=1&range=last_month#top").as_str(),
            "last_month"
        );
        assert_eq!(
            RangeSelector::from_page_url("/medications/?range=all_time").as_str(),
            "all_time"
        );
    }

    #[test]
    fn test_fragment_is_not_searched() {
        assert_eq!(
            RangeSelector::from_page_url("http://h/bp/#tab?range=all_time").as_str(),
            "last_week"
        );
        assert_eq!(
            RangeSelector::from_page_url("http://h/bp/?range=last_month#x?range=all_time")
                .as_str(),
            "last_month"
        );
        assert_eq!(
            RangeSelector::from_query("range=last+month").as_str(),
            "last month"
        );
    }

    #[test]
    fn test_unknown_token_passed_through() {
        let range = RangeSelector::from_query("range=last%20year");
        assert_eq!(range.as_str(), "last year");
        assert!(!range.is_known());
        assert!(RangeSelector::default().is_known());
    }

    #[test]
    fn test_request_path() {
        assert_eq!(
            RangeSelector::default().request_path("/weight/data"),
            "/weight/data?range=last_week"
        );
        assert_eq!(
            RangeSelector::new("a&b").request_path("/weight/data"),
            "/weight/data?range=a%26b"
        );
    }
}
