//! Serper web search client.
//!
//! Endpoint: POST {base_url}/search
//! Auth: X-API-KEY header

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Maximum query length sent to the search API
const MAX_QUERY_CHARS: usize = 400;

/// One organic search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<SearchResult>,
}

/// Serper search client
pub struct SerperClient {
    base_url: String,
    client: reqwest::Client,
}

impl SerperClient {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Search the web, returning at most `limit` organic results
    pub async fn search(&self, api_key: &str, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let query: String = query.chars().take(MAX_QUERY_CHARS).collect();

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", api_key)
            .json(&json!({ "q": query, "num": limit }))
            .send()
            .await
            .context("Failed to send search request")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Search API error ({}): {}", status, text.trim())
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse search response")?;

        Ok(body.organic.into_iter().take(limit).collect())
    }
}

/// Format results as a numbered list for a prompt
pub fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} ({})\n   {}", i + 1, r.title, r.link, r.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}
