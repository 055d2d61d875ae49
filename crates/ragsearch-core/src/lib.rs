//! Ragsearch Core Library
//!
//! Core functionality for searching a remote document corpus and
//! grounding LLM answers in the retrieved content.
//!
//! # Features
//! - Five retrieval strategies: keyword, vector, sparse expansion,
//!   reciprocal-rank fusion, weighted hybrid
//! - Query embedding via the engine's trained-model inference endpoint
//! - Sentinel-defaulted result normalization
//! - Per-hit grounded answer generation with bounded rate-limit retry
//! - Conversational sessions with first-turn grounding injection

pub mod answer;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod query;
pub mod search;

pub use answer::{AnswerGenerator, ProcessedResult, Sleeper, TokioSleeper};
pub use chat::{chat_turn, grounding_bodies, ChatSession};
pub use config::{Config, EngineConfig, LLMServiceConfig, TuningConfig};
pub use error::{Error, GenerationError, GenerationErrorKind, RagSearchError, Result};
pub use llm::{ChatClient, ChatMessage, Embedder, InferenceEmbedder, OpenAiClient};
pub use pipeline::Pipeline;
pub use query::{SearchRequest, Strategy, RESULT_SIZE};
pub use search::{
    display_score, normalize, HitSource, HitsEnvelope, NormalizedHit, Passage, SearchClient,
    SearchHit, SearchResponse,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "ragsearch";
