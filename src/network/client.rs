//! HTTP client for making requests to the search API

use super::user_agent::{accept_json, default_user_agent};
use crate::config::OutgoingSettings;
use crate::engines::{EngineRequest, EngineResponse};
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client wrapper with repo-scout specific configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().gzip(true).brotli(true);

        // Without a configured timeout the transport default applies
        if let Some(secs) = settings.request_timeout {
            builder = builder.timeout(Duration::from_secs_f64(secs));
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent: settings
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
        })
    }

    /// Execute an engine request
    pub async fn execute(&self, request: EngineRequest) -> Result<EngineResponse, reqwest::Error> {
        let mut req_builder = self
            .client
            .get(&request.url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_json());

        // Add custom headers
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse response into EngineResponse
    async fn parse_response(response: Response) -> Result<EngineResponse, reqwest::Error> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(EngineResponse { status, text })
    }
}
