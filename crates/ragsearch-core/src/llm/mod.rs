//! External model integration
//!
//! Provides traits and implementations for:
//! - Chat completion via an OpenAI-compatible HTTP service
//! - Query embedding via the search engine's trained-model inference endpoint

mod client;
mod infer_embedder;
mod traits;

pub use client::{ApiMetrics, ChatClient, ChatMessage, MetricsSnapshot, OpenAiClient};
pub use infer_embedder::InferenceEmbedder;
pub use traits::Embedder;
