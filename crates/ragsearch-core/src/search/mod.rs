//! Search execution
//!
//! Issues assembled requests against the engine's `_search` endpoint and
//! exposes the raw hit structures. Result normalization lives in
//! [`normalize`].

pub mod normalize;

pub use normalize::{display_score, normalize, NormalizedHit};

use crate::config::EngineConfig;
use crate::error::{RagSearchError, Result};
use crate::query::{SearchRequest, RESULT_SIZE};
use serde::Deserialize;
use std::time::Duration;

/// Engine response for one search request
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Engine-side query time in milliseconds
    #[serde(default)]
    pub took: u64,

    #[serde(default)]
    pub hits: HitsEnvelope,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// A single document hit
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    /// Relevance score on the engine's own scale; not comparable across
    /// strategies, and absent for some fused queries
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    #[serde(rename = "_source", default)]
    pub source: HitSource,
}

/// Document fields carried in `_source`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitSource {
    #[serde(default)]
    pub body_content: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub additional_urls: Option<Vec<String>>,

    #[serde(default)]
    pub passages: Option<Vec<Passage>>,
}

/// Passage excerpt nested under a hit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Passage {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub score: Option<f64>,
}

impl SearchResponse {
    /// Hits capped at [`RESULT_SIZE`], regardless of engine-returned count
    pub fn capped_hits(&self) -> &[SearchHit] {
        let n = self.hits.hits.len().min(RESULT_SIZE);
        &self.hits.hits[..n]
    }

    /// Whether the engine returned no hits (a valid empty result)
    pub fn is_empty(&self) -> bool {
        self.hits.hits.is_empty()
    }
}

/// Client for the search engine's `_search` endpoint
pub struct SearchClient {
    http_client: reqwest::Client,
    config: EngineConfig,
}

impl SearchClient {
    /// Create from engine configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(RagSearchError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Engine configuration in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Setup-time connectivity check.
    ///
    /// The CLI halts on failure here, mirroring the application's
    /// connect-or-exit startup behavior.
    pub async fn ping(&self) -> Result<()> {
        let mut req = self.http_client.get(&self.config.url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("ApiKey {}", api_key));
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            return Err(RagSearchError::Retrieval(format!(
                "engine ping failed (HTTP {})",
                response.status()
            )));
        }

        Ok(())
    }

    /// Execute a search request and return the raw response.
    ///
    /// An engine response with no hits is a valid empty result, not an
    /// error.
    pub async fn execute(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let body = request.body(&self.config);
        let url = format!("{}/{}/_search", self.config.url, self.config.index);

        let mut req = self.http_client.post(&url).json(&body);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("ApiKey {}", api_key));
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagSearchError::Retrieval(format!(
                "search failed (HTTP {}): {}",
                status, body
            )));
        }

        let search_response: SearchResponse = response.json().await?;

        tracing::debug!(
            strategy = %request.strategy(),
            took_ms = search_response.took,
            hits = search_response.hits.hits.len(),
            "search executed"
        );

        Ok(search_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(score: Option<f64>) -> SearchHit {
        SearchHit {
            id: None,
            score,
            source: HitSource::default(),
        }
    }

    #[test]
    fn caps_hits_at_result_size() {
        let response = SearchResponse {
            took: 3,
            hits: HitsEnvelope {
                hits: (0..8).map(|i| hit(Some(i as f64))).collect(),
            },
        };
        assert_eq!(response.capped_hits().len(), RESULT_SIZE);
    }

    #[test]
    fn short_responses_pass_through() {
        let response = SearchResponse {
            took: 1,
            hits: HitsEnvelope {
                hits: vec![hit(None), hit(Some(1.0))],
            },
        };
        assert_eq!(response.capped_hits().len(), 2);
        assert!(!response.is_empty());
    }

    #[test]
    fn parses_engine_response() {
        let raw = serde_json::json!({
            "took": 12,
            "hits": {
                "hits": [
                    {
                        "_id": "doc-1",
                        "_score": 4.2,
                        "_source": {
                            "body_content": "body",
                            "title": "Title",
                            "url": "https://example.com/a",
                            "passages": [{"text": "first passage"}]
                        }
                    }
                ]
            }
        });
        let response: SearchResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.took, 12);
        let hit = &response.hits.hits[0];
        assert_eq!(hit.score, Some(4.2));
        assert_eq!(hit.source.title.as_deref(), Some("Title"));
        assert_eq!(
            hit.source.passages.as_ref().unwrap()[0].text.as_deref(),
            Some("first passage")
        );
    }

    #[test]
    fn missing_hits_is_empty() {
        let response: SearchResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(response.is_empty());
        assert_eq!(response.capped_hits().len(), 0);
    }
}
