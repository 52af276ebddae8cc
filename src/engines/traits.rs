//! Engine traits and types

use crate::query::SearchRequest;
use crate::search::SearchPage;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Why a fetch failed
///
/// The orchestrator collapses every variant into the same error state; the
/// distinction only shows up in logs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// HTTP request to be made by an engine
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// Full URL including the query string
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
}

impl EngineRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// HTTP response from an engine request
#[derive(Debug)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl EngineResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can answer a repository search request
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Source name, used in logs
    fn name(&self) -> &str;

    /// Fetch one page of results
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, FetchError>;
}
