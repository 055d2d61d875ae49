//! Configuration management

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Search engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Chat-completion service configuration
    #[serde(default)]
    pub llm_service: LLMServiceConfig,

    /// Retrieval tunables
    #[serde(default)]
    pub tuning: TuningConfig,
}

/// Search engine configuration (endpoint, index, field mapping)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the search engine
    pub url: String,

    /// Index to search
    #[serde(default = "default_index")]
    pub index: String,

    /// API key (optional, sent as a bearer token)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Field holding the main document text
    #[serde(default = "default_body_field")]
    pub body_field: String,

    /// Field combining title/body relevancy signals, used by the weighted hybrid strategy
    #[serde(default = "default_relevancy_field")]
    pub relevancy_field: String,

    /// Document-level dense vector field, used by the weighted hybrid strategy
    #[serde(default = "default_dense_vector_field")]
    pub dense_vector_field: String,

    /// Trained model id for the dense embedding inference endpoint
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sparse-expansion model id (invoked server-side)
    #[serde(default = "default_sparse_model")]
    pub sparse_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("RAGSEARCH_ENGINE_URL")
                .unwrap_or_else(|_| "http://localhost:9200".to_string()),
            index: std::env::var("RAGSEARCH_INDEX").unwrap_or_else(|_| default_index()),
            api_key: std::env::var("RAGSEARCH_ENGINE_API_KEY").ok(),
            body_field: default_body_field(),
            relevancy_field: default_relevancy_field(),
            dense_vector_field: default_dense_vector_field(),
            embedding_model: std::env::var("RAGSEARCH_EMBEDDING_MODEL")
                .unwrap_or_else(|_| default_embedding_model()),
            sparse_model: default_sparse_model(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Chat-completion service configuration for external inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL of the completion service
    pub url: String,

    /// Model name for chat completions
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// API key (optional, for authenticated services)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("RAGSEARCH_LLM_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            model: default_chat_model(),
            api_key: std::env::var("RAGSEARCH_LLM_API_KEY").ok(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Retrieval tunables exposed on the configuration surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Keyword-score boost for the weighted hybrid strategy (0.0 - 5.0)
    #[serde(default)]
    pub bm25_boost: f64,

    /// Vector-score boost for the weighted hybrid strategy (0.0 - 5.0)
    #[serde(default)]
    pub knn_boost: f64,

    /// Rank constant for reciprocal rank fusion
    #[serde(default = "default_rrf_rank_constant")]
    pub rrf_rank_constant: u32,

    /// Window size for reciprocal rank fusion
    #[serde(default = "default_rrf_window_size")]
    pub rrf_window_size: u32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            bm25_boost: 0.0,
            knn_boost: 0.0,
            rrf_rank_constant: default_rrf_rank_constant(),
            rrf_window_size: default_rrf_window_size(),
        }
    }
}

fn default_index() -> String {
    "search-corpus".to_string()
}

fn default_body_field() -> String {
    "body_content".to_string()
}

fn default_relevancy_field() -> String {
    "combined_relevancy".to_string()
}

fn default_dense_vector_field() -> String {
    "text_embedding.predicted_value".to_string()
}

fn default_embedding_model() -> String {
    "sentence-transformers__all-minilm-l6-v2".to_string()
}

fn default_sparse_model() -> String {
    ".elser_model_2_linux-x86_64".to_string()
}

fn default_chat_model() -> String {
    std::env::var("RAGSEARCH_LLM_MODEL").unwrap_or_else(|_| "gpt-35-turbo".to_string())
}

fn default_timeout() -> u64 {
    30
}

fn default_rrf_rank_constant() -> u32 {
    1
}

fn default_rrf_window_size() -> u32 {
    200
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}
