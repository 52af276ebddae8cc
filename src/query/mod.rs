//! Query construction
//!
//! Turns the effective query key into the outbound search request:
//! - Name term: the settled query text, matched against repository names (`in:name`)
//! - Language restriction: `language:<lang>`
//! - Recency: `created:>=<YYYY-MM-DD>`, a fixed number of days before today
//! - License: `license:<key>`, only when a license is selected
//!
//! Everything here is a pure function of its inputs, so the same key, settings
//! and date always produce the same request.

use crate::config::SearchSettings;
use crate::search::QueryKey;
use chrono::{Duration, NaiveDate};

/// Sort order is fixed; only the metric is configurable
pub const ORDER: &str = "desc";

/// Qualifier restricting the name term to repository names
const NAME_QUALIFIER: &str = "in:name";

/// Date `recency_days` before `today`
///
/// A window reaching past the earliest representable date falls back to the
/// Unix epoch, which leaves the recency filter effectively open.
pub fn created_since(today: NaiveDate, recency_days: u32) -> NaiveDate {
    today
        .checked_sub_signed(Duration::days(i64::from(recency_days)))
        .unwrap_or_default()
}

/// Build the search expression (the `q` parameter)
///
/// Terms are space separated; a blank `text` contributes no term, and the
/// license clause only appears when `license` is non-empty.
pub fn build_expression(
    text: &str,
    language: &str,
    created_since: NaiveDate,
    license: &str,
) -> String {
    let mut terms: Vec<String> = Vec::with_capacity(5);

    let text = text.trim();
    if !text.is_empty() {
        terms.push(text.to_string());
    }
    terms.push(NAME_QUALIFIER.to_string());
    terms.push(format!("language:{}", language));
    terms.push(format!("created:>={}", created_since.format("%Y-%m-%d")));

    let license = license.trim();
    if !license.is_empty() {
        terms.push(format!("license:{}", license));
    }

    terms.join(" ")
}

/// A fully built repository search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search expression (`q`)
    pub expression: String,
    /// Sort metric
    pub sort: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Results per page
    pub per_page: u32,
}

impl SearchRequest {
    /// Build the request for `key` as of `today`
    pub fn build(key: &QueryKey, settings: &SearchSettings, today: NaiveDate) -> Self {
        let since = created_since(today, settings.recency_days);
        Self {
            expression: build_expression(&key.text, &settings.language, since, &key.license),
            sort: settings.sort.clone(),
            page: key.page,
            per_page: settings.page_size,
        }
    }

    /// Query parameters in wire order
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.expression.clone()),
            ("sort", self.sort.clone()),
            ("order", ORDER.to_string()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }

    /// Full request URL against `endpoint`, every value percent-encoded
    pub fn url(&self, endpoint: &str) -> String {
        let query = self
            .params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(&v)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}{}", endpoint, separator, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_created_since_crosses_month() {
        assert_eq!(created_since(date(2024, 3, 10), 30), date(2024, 2, 9));
        assert_eq!(created_since(date(2024, 1, 15), 30), date(2023, 12, 16));
    }

    #[test]
    fn test_created_since_never_overflows() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(created_since(date(2024, 6, 30), u32::MAX), epoch);
        assert_eq!(created_since(NaiveDate::MIN, 1), epoch);
    }

    #[test]
    fn test_expression_without_license() {
        let expr = build_expression("react", "javascript", date(2024, 5, 1), "");
        assert_eq!(expr, "react in:name language:javascript created:>=2024-05-01");
        assert!(!expr.contains("license:"));
    }

    #[test]
    fn test_expression_with_license() {
        let expr = build_expression("react", "javascript", date(2024, 5, 1), "mit");
        assert_eq!(
            expr,
            "react in:name language:javascript created:>=2024-05-01 license:mit"
        );
    }

    #[test]
    fn test_blank_text_has_no_name_term() {
        let expr = build_expression("   ", "javascript", date(2024, 5, 1), "");
        assert_eq!(expr, "in:name language:javascript created:>=2024-05-01");
    }

    #[test]
    fn test_request_from_default_key() {
        let settings = SearchSettings::default();
        let request = SearchRequest::build(&QueryKey::default(), &settings, date(2024, 6, 30));

        assert_eq!(
            request.expression,
            "in:name language:javascript created:>=2024-05-31"
        );
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 20);
        assert_eq!(request.sort, "stars");
    }

    #[test]
    fn test_build_is_deterministic() {
        let settings = SearchSettings::default();
        let key = QueryKey::new("vue", "apache-2.0", 3);
        let a = SearchRequest::build(&key, &settings, date(2024, 6, 30));
        let b = SearchRequest::build(&key, &settings, date(2024, 6, 30));
        assert_eq!(a, b);
        assert_eq!(a.page, 3);
    }

    #[test]
    fn test_url_encoding() {
        let request = SearchRequest {
            expression: "foo in:name created:>=2024-01-01".to_string(),
            sort: "stars".to_string(),
            page: 2,
            per_page: 20,
        };
        let url = request.url("https://api.github.com/search/repositories");
        assert_eq!(
            url,
            "https://api.github.com/search/repositories?q=foo%20in%3Aname%20created%3A%3E%3D2024-01-01&sort=stars&order=desc&page=2&per_page=20"
        );
    }
}
