//! Sequential search pipeline
//!
//! One user action runs one fully sequential pipeline: build query
//! (embedding the text first when the strategy needs it), execute the
//! search, normalize hits, generate answers. No requests overlap and
//! there is no mid-pipeline cancellation.

use crate::answer::{AnswerGenerator, ProcessedResult};
use crate::config::Config;
use crate::error::Result;
use crate::llm::{Embedder, InferenceEmbedder, OpenAiClient};
use crate::query::{SearchRequest, Strategy};
use crate::search::{SearchClient, SearchResponse};
use std::sync::Arc;

/// Wires the query builder, embedder, executor and answer generator
pub struct Pipeline {
    search: SearchClient,
    embedder: Arc<dyn Embedder>,
    generator: AnswerGenerator,
    config: Config,
}

impl Pipeline {
    /// Build a pipeline from configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let search = SearchClient::new(config.engine.clone())?;
        let embedder: Arc<dyn Embedder> = Arc::new(InferenceEmbedder::new(config.engine.clone())?);
        let generator = AnswerGenerator::new(Arc::new(OpenAiClient::new(
            config.llm_service.clone(),
        )?));

        Ok(Self {
            search,
            embedder,
            generator,
            config,
        })
    }

    /// Build a pipeline with injected components (used by tests)
    pub fn with_components(
        search: SearchClient,
        embedder: Arc<dyn Embedder>,
        generator: AnswerGenerator,
        config: Config,
    ) -> Self {
        Self {
            search,
            embedder,
            generator,
            config,
        }
    }

    /// Setup-time engine connectivity check
    pub async fn ping(&self) -> Result<()> {
        self.search.ping().await
    }

    /// Build and execute the request for a strategy, returning raw hits.
    ///
    /// Embedding failures are fatal for the attempt; strategies that do
    /// not need a vector never touch the inference endpoint.
    pub async fn retrieve(&self, query: &str, strategy: Strategy) -> Result<SearchResponse> {
        let embedding = if strategy.requires_embedding() {
            Some(self.embedder.embed(query).await?)
        } else {
            None
        };

        let request = SearchRequest::build(strategy, query, embedding, &self.config.tuning)?;

        self.search.execute(&request).await
    }

    /// Full search: retrieve, then answer the question once per hit
    pub async fn search(&self, query: &str, strategy: Strategy) -> Result<Vec<ProcessedResult>> {
        let response = self.retrieve(query, strategy).await?;

        if response.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.generator.answer_hits(query, &response).await)
    }
}
