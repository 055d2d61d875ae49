//! Answer generation
//!
//! Turns retrieved hits into grounded answers by prompting the
//! chat-completion service once per hit, with bounded retry on
//! rate-limit failures and a fixed pacing delay between hits.

use crate::error::GenerationErrorKind;
use crate::llm::{ChatClient, ChatMessage};
use crate::search::{normalize, NormalizedHit, SearchResponse};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Attempts per hit before giving up on a rate-limited call
pub const RETRY_ATTEMPTS: u32 = 3;

/// Backoff between rate-limited attempts
pub const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Pacing delay between hits, on top of any retry backoff
pub const PACING_DELAY: Duration = Duration::from_secs(4);

/// Fixed system instruction for per-hit answering
pub const SYSTEM_INSTRUCTION: &str = "You are an AI assistant. Your answers should stay short \
     and concise. Explain your answer. No formalities.";

/// Display-ready result record, one per answered hit
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedResult {
    /// Raw body text the answer was grounded in
    pub body: String,
    /// Generated answer text
    pub answer: String,
    /// Engine relevance score, if the engine produced one
    pub score: Option<f64>,
    /// Engine-side query time for the whole search, in milliseconds
    pub search_ms: u64,
    /// Wall-clock time of the completion call, in milliseconds
    pub generation_ms: u64,
    /// Resolved URL (first additional URL preferred over the primary)
    pub url: String,
    pub title: String,
    /// First passage excerpt, or a sentinel
    pub first_passage: String,
}

/// Delay seam so tests can run the retry loop without sleeping
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Grounding prompt for one hit
fn grounding_prompt(question: &str, body: &str) -> String {
    format!(
        "Answer this question. Keep the response less than 30 words. {} based on the following text {}",
        question, body
    )
}

/// Generates grounded answers for retrieved hits
pub struct AnswerGenerator {
    client: Arc<dyn ChatClient>,
    sleeper: Arc<dyn Sleeper>,
}

impl AnswerGenerator {
    /// Create with the production sleeper
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self::with_sleeper(client, Arc::new(TokioSleeper))
    }

    /// Create with an injected delay implementation
    pub fn with_sleeper(client: Arc<dyn ChatClient>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { client, sleeper }
    }

    /// Answer the question once per capped hit.
    ///
    /// A hit whose completion call fails permanently is skipped: no
    /// result is recorded for it and the loop moves on. The returned
    /// list may therefore be shorter than the hit list.
    pub async fn answer_hits(
        &self,
        question: &str,
        response: &SearchResponse,
    ) -> Vec<ProcessedResult> {
        let hits = response.capped_hits();
        let mut results = Vec::with_capacity(hits.len());

        for (idx, hit) in hits.iter().enumerate() {
            let normalized = normalize(hit);

            if let Some(result) = self
                .answer_one(question, &normalized, response.took)
                .await
            {
                results.push(result);
            }

            // Pace requests to the completion service between hits
            if idx + 1 < hits.len() {
                self.sleeper.sleep(PACING_DELAY).await;
            }
        }

        results
    }

    /// Run the bounded retry loop for a single hit
    async fn answer_one(
        &self,
        question: &str,
        normalized: &NormalizedHit,
        search_ms: u64,
    ) -> Option<ProcessedResult> {
        let messages = vec![
            ChatMessage::system(SYSTEM_INSTRUCTION),
            ChatMessage::user(grounding_prompt(question, &normalized.body)),
        ];

        for attempt in 1..=RETRY_ATTEMPTS {
            let start = Instant::now();

            match self.client.chat_completion(messages.clone()).await {
                Ok(answer) => {
                    let generation_ms = start.elapsed().as_millis() as u64;
                    return Some(ProcessedResult {
                        body: normalized.body.clone(),
                        answer,
                        score: normalized.score,
                        search_ms,
                        generation_ms,
                        url: normalized.url.clone(),
                        title: normalized.title.clone(),
                        first_passage: normalized.first_passage.clone(),
                    });
                }
                Err(err) if err.kind == GenerationErrorKind::RateLimited => {
                    if attempt < RETRY_ATTEMPTS {
                        tracing::warn!(
                            attempt,
                            "rate limited, retrying in {}s",
                            RETRY_BACKOFF.as_secs()
                        );
                        self.sleeper.sleep(RETRY_BACKOFF).await;
                    } else {
                        tracing::warn!("rate limited, no more retries; skipping hit");
                    }
                }
                Err(err) => {
                    // Non-transient failure classes abandon this hit immediately
                    tracing::warn!(kind = ?err.kind, error = %err.message, "generation failed");
                    return None;
                }
            }
        }

        None
    }
}
