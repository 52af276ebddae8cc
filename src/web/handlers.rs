//! HTTP request handlers

use super::state::AppState;
use crate::licenses::{self, License};
use crate::search::{SearchError, SearchState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Search state plus what a paginator needs
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub instance: String,
    #[serde(flatten)]
    pub state: SearchState,
    pub page_size: u32,
    pub page_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct LicenseBody {
    /// Empty clears the filter
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct PageBody {
    pub page: u32,
}

/// Current search state
pub async fn state(State(state): State<AppState>) -> Json<StateResponse> {
    let search = &state.settings.search;
    let snapshot = state.search.state();
    let page_count = snapshot.page_count(search.page_size, search.result_cap);

    Json(StateResponse {
        instance: state.instance_name().to_string(),
        state: snapshot,
        page_size: search.page_size,
        page_count,
    })
}

pub async fn set_query(State(state): State<AppState>, Json(body): Json<QueryBody>) -> Response {
    accepted(state.search.set_query_text(body.text))
}

pub async fn set_license(
    State(state): State<AppState>,
    Json(body): Json<LicenseBody>,
) -> Response {
    accepted(state.search.set_license(body.key))
}

pub async fn set_page(State(state): State<AppState>, Json(body): Json<PageBody>) -> Response {
    accepted(state.search.set_page(body.page))
}

/// License catalog for the picker
pub async fn licenses() -> Json<&'static [License]> {
    Json(licenses::catalog())
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn accepted(result: Result<(), SearchError>) -> Response {
    match result {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e @ SearchError::InvalidPage) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e @ SearchError::Closed) => {
            tracing::error!("Setter called after shutdown: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Settings;
    use crate::engines::{FetchError, RepositorySource};
    use crate::query::SearchRequest;
    use crate::search::{Orchestrator, SearchPage};
    use crate::web::{create_router, AppState};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StaticSource;

    #[async_trait]
    impl RepositorySource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn search(&self, _request: &SearchRequest) -> Result<SearchPage, FetchError> {
            Ok(SearchPage {
                items: vec![serde_json::from_value(json!({ "full_name": "a/b" })).unwrap()],
                total_count: 57,
            })
        }
    }

    fn app() -> (Router, AppState) {
        let settings = Settings::default();
        let (handle, _task) =
            Orchestrator::new(settings.search.clone(), Arc::new(StaticSource)).spawn();
        let state = AppState::new(settings, handle);
        (create_router(state.clone()), state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_state_reports_results_and_page_count() {
        let (app, state) = app();
        let mut rx = state.search.subscribe();
        rx.wait_for(|s| s.total_count == 57).await.unwrap();

        let (status, body) = send(&app, Method::GET, "/api/state", None).await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["instance"], "repo-scout");
        assert_eq!(json["total_count"], 57);
        assert_eq!(json["page_number"], 1);
        assert_eq!(json["page_size"], 20);
        assert_eq!(json["page_count"], 3);
        assert_eq!(json["is_loading"], false);
        assert_eq!(json["results"][0]["full_name"], "a/b");
    }

    #[tokio::test]
    async fn test_setters_update_state() {
        let (app, state) = app();

        let (status, _) = send(&app, Method::PUT, "/api/page", Some(json!({ "page": 2 }))).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let (status, _) =
            send(&app, Method::PUT, "/api/license", Some(json!({ "key": " mit " }))).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let (status, _) = send(&app, Method::PUT, "/api/query", Some(json!({ "text": "foo" }))).await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let mut rx = state.search.subscribe();
        let snapshot = rx
            .wait_for(|s| s.query_text == "foo")
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.license_key, "mit");
        assert_eq!(snapshot.page_number, 1);
    }

    #[tokio::test]
    async fn test_page_zero_rejected() {
        let (app, _) = app();
        let (status, _) = send(&app, Method::PUT, "/api/page", Some(json!({ "page": 0 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_license_catalog() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::GET, "/api/licenses", None).await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_slice(&body).unwrap();
        let keys: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|l| l["key"].as_str())
            .collect();
        assert!(keys.contains(&"mit"));
        assert!(keys.contains(&"apache-2.0"));
    }
}
