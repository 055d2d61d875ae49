//! Query embedding via the search engine's trained-model inference endpoint

use super::Embedder;
use crate::config::EngineConfig;
use crate::error::{RagSearchError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Embedder that calls the engine-hosted dense embedding model.
///
/// Embedding failures are fatal for the search attempt; retry policy
/// lives at the answer-generation layer only.
pub struct InferenceEmbedder {
    http_client: reqwest::Client,
    config: EngineConfig,
}

impl InferenceEmbedder {
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
}

#[async_trait]
impl Embedder for InferenceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct InferRequest {
            docs: Vec<InferDoc>,
        }

        #[derive(Serialize)]
        struct InferDoc {
            text_field: String,
        }

        #[derive(Deserialize)]
        struct InferResponse {
            inference_results: Vec<InferResult>,
        }

        #[derive(Deserialize)]
        struct InferResult {
            predicted_value: Vec<f32>,
        }

        let request = InferRequest {
            docs: vec![InferDoc {
                text_field: text.to_string(),
            }],
        };

        let url = format!(
            "{}/_ml/trained_models/{}/_infer",
            self.config.url, self.config.embedding_model
        );

        let mut req = self.http_client.post(&url).json(&request);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("ApiKey {}", api_key));
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagSearchError::Retrieval(format!(
                "inference endpoint error (HTTP {}): {}",
                status, body
            )));
        }

        let infer_response: InferResponse = response.json().await?;

        let embedding = infer_response
            .inference_results
            .into_iter()
            .next()
            .map(|r| r.predicted_value)
            .ok_or_else(|| RagSearchError::Retrieval("no inference results returned".to_string()))?;

        tracing::debug!(dims = embedding.len(), "query embedded");

        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.config.embedding_model
    }
}
