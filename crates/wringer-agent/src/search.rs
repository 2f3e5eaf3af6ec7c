// ABOUTME: Web-search client for the research stages, backed by a SearXNG-compatible JSON API.
// ABOUTME: Failures never propagate: any error degrades to an empty result set, logged for observability.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-request timeout for the search provider.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One search hit returned to the invoking stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Client for a SearXNG-compatible search endpoint.
///
/// The contract with callers is total: `search` always returns a (possibly
/// empty) result list, never an error. Timeouts, transport failures,
/// non-2xx statuses, and malformed payloads all degrade to empty results
/// with a warning log. No caching and no internal retry.
pub struct SearchClient {
    client: reqwest::Client,
    base_url: String,
    max_results: usize,
}

impl SearchClient {
    /// Create a client for the given base URL (e.g. "https://searx.be").
    /// `max_results` is the default bound research stages request per query.
    pub fn new(base_url: String, max_results: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            max_results,
        }
    }

    /// The default result bound configured for this client.
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Run one search, returning at most `max_results` hits.
    /// Any failure yields an empty vector; the reason is logged.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let url = format!(
            "{}/search?q={}&format=json",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = match self
            .client
            .get(&url)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(query, error = %e, "search request failed, returning no results");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                query,
                status = %response.status(),
                "search provider returned an error status, returning no results"
            );
            return Vec::new();
        }

        let body: Value = match response.json().await {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(query, error = %e, "search response was not valid JSON, returning no results");
                return Vec::new();
            }
        };

        let results = parse_results(&body, max_results);
        tracing::debug!(query, hits = results.len(), "search completed");
        results
    }
}

/// Extract up to `max_results` hits from a SearXNG JSON payload.
/// Entries without a title or URL are skipped.
fn parse_results(body: &Value, max_results: usize) -> Vec<SearchResult> {
    let Some(entries) = body.get("results").and_then(|r| r.as_array()) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let title = entry.get("title").and_then(|t| t.as_str())?;
            let url = entry.get("url").and_then(|u| u.as_str())?;
            let snippet = entry
                .get("content")
                .and_then(|c| c.as_str())
                .unwrap_or_default();
            Some(SearchResult {
                title: title.to_string(),
                snippet: snippet.to_string(),
                url: url.to_string(),
            })
        })
        .take(max_results)
        .collect()
}
