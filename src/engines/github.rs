//! GitHub repository search
//!
//! Uses GitHub's official REST API (`/search/repositories`).

use super::traits::*;
use crate::network::HttpClient;
use crate::query::SearchRequest;
use crate::search::{Item, SearchPage};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Response body contract; anything that doesn't match is malformed
#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    total_count: u64,
    items: Vec<Item>,
}

/// GitHub repository search source
#[derive(Clone)]
pub struct GitHub {
    api_url: String,
    client: HttpClient,
}

impl GitHub {
    pub fn new(api_url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            api_url: api_url.into(),
            client,
        }
    }

    /// Build the HTTP request for a search
    pub fn request(&self, request: &SearchRequest) -> EngineRequest {
        EngineRequest::get(request.url(&self.api_url))
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Parse the HTTP response into a page of results
    pub fn response(&self, response: EngineResponse) -> Result<SearchPage, FetchError> {
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }

        let body: SearchResponseBody = serde_json::from_str(&response.text)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        Ok(SearchPage {
            items: body.items,
            total_count: body.total_count,
        })
    }
}

#[async_trait]
impl RepositorySource for GitHub {
    fn name(&self) -> &str {
        "github"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, FetchError> {
        let engine_request = self.request(request);
        debug!("GET {}", engine_request.url);

        let response = self.client.execute(engine_request).await?;
        self.response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn github(url: &str) -> GitHub {
        GitHub::new(url, HttpClient::new().unwrap())
    }

    fn search_request(page: u32) -> SearchRequest {
        SearchRequest {
            expression: "foo in:name language:javascript created:>=2024-05-01".to_string(),
            sort: "stars".to_string(),
            page,
            per_page: 20,
        }
    }

    fn response(status: u16, text: &str) -> EngineResponse {
        EngineResponse {
            status,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_github_request() {
        let gh = github("https://api.github.com/search/repositories");
        let request = gh.request(&search_request(2));

        assert!(request.url.starts_with("https://api.github.com/search/repositories?q="));
        assert!(request.url.contains("&page=2&per_page=20"));
        assert!(request.headers.contains_key("X-GitHub-Api-Version"));
    }

    #[test]
    fn test_response_contract() {
        let gh = github("https://api.github.com/search/repositories");

        let page = gh
            .response(response(
                200,
                r#"{"total_count": 57, "incomplete_results": false, "items": [{"id": 1}, {"id": 2}, {"id": 3}]}"#,
            ))
            .unwrap();
        assert_eq!(page.total_count, 57);
        assert_eq!(page.items.len(), 3);

        assert!(matches!(
            gh.response(response(403, "{}")),
            Err(FetchError::Status(403))
        ));
        assert!(matches!(
            gh.response(response(200, r#"{"items": []}"#)),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            gh.response(response(200, r#"{"total_count": 1, "items": [42]}"#)),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            gh.response(response(200, "<html>")),
            Err(FetchError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_search_against_mock_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .and(query_param(
                "q",
                "foo in:name language:javascript created:>=2024-05-01",
            ))
            .and(query_param("sort", "stars"))
            .and(query_param("order", "desc"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "20"))
            .and(header_exists("User-Agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_count": 2,
                "items": [
                    { "full_name": "a/foo", "stargazers_count": 10 },
                    { "full_name": "b/foobar", "stargazers_count": 5 }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gh = github(&format!("{}/search/repositories", server.uri()));
        let page = gh.search(&search_request(1)).await.unwrap();

        assert_eq!(page.total_count, 2);
        assert_eq!(page.items[0].full_name(), Some("a/foo"));
        assert_eq!(page.items[1].stars(), Some(5));
    }

    #[tokio::test]
    async fn test_search_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let gh = github(&format!("{}/search/repositories", server.uri()));
        let result = gh.search(&search_request(1)).await;
        assert!(matches!(result, Err(FetchError::Status(500))));
    }

    #[tokio::test]
    async fn test_search_unreachable() {
        // Nothing listens on port 9 locally
        let gh = github("http://127.0.0.1:9/search/repositories");
        let result = gh.search(&search_request(1)).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
