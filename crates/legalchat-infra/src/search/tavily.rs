//! TavilyClient -- [`WebSearch`] backed by the Tavily search API.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use legalchat_core::tool::search::{SearchResult, WebSearch};
use legalchat_types::error::{ConfigError, SearchError};

/// Request body for `POST /search`.
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    search_depth: &'static str,
    include_answer: bool,
    include_images: bool,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
    #[serde(default)]
    content: String,
}

/// Tavily web search client.
pub struct TavilyClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl TavilyClient {
    pub fn new(api_key: SecretString, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl WebSearch for TavilyClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchResult>, SearchError> {
        let url = format!("{}/search", self.base_url);
        let body = TavilyRequest {
            api_key: self.api_key.expose_secret(),
            query,
            max_results,
            search_depth: "advanced",
            include_answer: false,
            include_images: false,
            include_raw_content: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        debug!(results = parsed.results.len(), "tavily search complete");

        Ok(parsed
            .results
            .into_iter()
            .take(max_results as usize)
            .map(|r| SearchResult {
                url: r.url,
                content: r.content,
            })
            .collect())
    }
}
