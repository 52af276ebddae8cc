//! Search state and related data models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A repository record returned by the search API
///
/// The record is passed through untouched; the accessors below only read
/// commonly displayed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(pub Map<String, Value>);

impl Item {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// `owner/name`
    pub fn full_name(&self) -> Option<&str> {
        self.str_field("full_name")
    }

    pub fn html_url(&self) -> Option<&str> {
        self.str_field("html_url")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    pub fn stars(&self) -> Option<u64> {
        self.0.get("stargazers_count").and_then(Value::as_u64)
    }

    /// License key (e.g. `mit`), if the repository declares one
    pub fn license_key(&self) -> Option<&str> {
        self.0
            .get("license")
            .and_then(|l| l.get("key"))
            .and_then(Value::as_str)
    }

    /// Raw field access
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// The effective query key: a new fetch is issued whenever it changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    /// Settled (debounced) query text
    pub text: String,
    /// License key, empty for no filter
    pub license: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl QueryKey {
    pub fn new(text: impl Into<String>, license: impl Into<String>, page: u32) -> Self {
        Self {
            text: text.into(),
            license: license.into(),
            page,
        }
    }
}

impl Default for QueryKey {
    fn default() -> Self {
        Self::new("", "", 1)
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub items: Vec<Item>,
    pub total_count: u64,
}

/// State transitions; every mutation of [`SearchState`] goes through one of these
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    SetQueryText(String),
    SetLicense(String),
    SetPage(u32),
    FetchStart,
    FetchSuccess { items: Vec<Item>, total: u64 },
    FetchFailure,
}

/// Search state observed by the presentation layer
///
/// `is_loading` and `has_error` are never both set, and `results` is empty
/// while either is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    pub query_text: String,
    pub license_key: String,
    pub page_number: u32,
    pub results: Vec<Item>,
    pub total_count: u64,
    pub is_loading: bool,
    pub has_error: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query_text: String::new(),
            license_key: String::new(),
            page_number: 1,
            results: Vec::new(),
            total_count: 0,
            is_loading: false,
            has_error: false,
        }
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a single transition
    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::SetQueryText(text) => {
                self.query_text = text;
                self.page_number = 1;
            }
            Transition::SetLicense(key) => {
                self.license_key = key;
                self.page_number = 1;
            }
            Transition::SetPage(page) => {
                self.page_number = page.max(1);
            }
            Transition::FetchStart => {
                self.is_loading = true;
                self.has_error = false;
                self.results.clear();
                self.total_count = 0;
            }
            Transition::FetchSuccess { items, total } => {
                self.is_loading = false;
                self.has_error = false;
                self.results = items;
                self.total_count = total;
            }
            Transition::FetchFailure => {
                self.is_loading = false;
                self.has_error = true;
                self.results.clear();
                self.total_count = 0;
            }
        }
    }

    /// Number of reachable pages
    ///
    /// The API never serves more than `result_cap` results for a query, so
    /// pages past that window are not offered.
    pub fn page_count(&self, page_size: u32, result_cap: u64) -> u32 {
        if page_size == 0 {
            return 0;
        }
        let reachable = self.total_count.min(result_cap);
        let pages = reachable.div_ceil(u64::from(page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}
