//! Search request construction
//!
//! Maps (query text, strategy, tunables) to the JSON body of one of the
//! five supported retrieval strategies. Strategy selection is a closed
//! enum, exhaustively matched here; unknown labels fail loudly instead
//! of falling back to a default query.

use crate::config::{EngineConfig, TuningConfig};
use crate::error::{RagSearchError, Result};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Number of results consumed per query, regardless of what the engine returns
pub const RESULT_SIZE: usize = 5;

/// Nested passage-level dense vector field
const PASSAGES_VECTOR_FIELD: &str = "passages.vector.predicted_value";

/// Nested passage-level sparse expansion field
const PASSAGES_SPARSE_FIELD: &str = "passages.content_embedding.predicted_value";

/// Retrieval strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Free-text keyword match over the body field
    Keyword,
    /// Nearest-neighbor search over passage vectors
    Vector,
    /// Server-side sparse expansion over passage term activations
    SparseExpansion,
    /// Keyword + vector + sparse sub-searches fused by reciprocal rank
    FusedRank,
    /// Weighted keyword and vector clauses in a single query
    HybridWeighted,
}

impl Strategy {
    /// Whether this strategy needs a query embedding before building the request
    pub fn requires_embedding(&self) -> bool {
        matches!(
            self,
            Strategy::Vector | Strategy::FusedRank | Strategy::HybridWeighted
        )
    }

    /// Canonical label, used by output formatters
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Keyword => "keyword",
            Strategy::Vector => "vector",
            Strategy::SparseExpansion => "sparse",
            Strategy::FusedRank => "fused",
            Strategy::HybridWeighted => "hybrid",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = RagSearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "keyword" | "bm25" => Ok(Strategy::Keyword),
            "vector" | "knn" => Ok(Strategy::Vector),
            "sparse" | "elser" | "sparse-expansion" => Ok(Strategy::SparseExpansion),
            "fused" | "rrf" | "fused-rank" => Ok(Strategy::FusedRank),
            "hybrid" | "hybrid-weighted" => Ok(Strategy::HybridWeighted),
            other => Err(RagSearchError::InvalidStrategy(other.to_string())),
        }
    }
}

/// A fully-assembled search request, one variant per strategy.
///
/// Each variant carries only the inputs its strategy needs; the engine
/// body is rendered by [`SearchRequest::body`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest {
    Keyword {
        query: String,
    },
    Vector {
        vector: Vec<f32>,
    },
    SparseExpansion {
        query: String,
    },
    FusedRank {
        query: String,
        vector: Vec<f32>,
        rank_constant: u32,
        window_size: u32,
    },
    HybridWeighted {
        query: String,
        vector: Vec<f32>,
        bm25_boost: f64,
        knn_boost: f64,
    },
}

impl SearchRequest {
    /// Build a request for the given strategy.
    ///
    /// `embedding` must be present for strategies where
    /// [`Strategy::requires_embedding`] is true.
    pub fn build(
        strategy: Strategy,
        query: &str,
        embedding: Option<Vec<f32>>,
        tuning: &TuningConfig,
    ) -> Result<Self> {
        let need_vector = |embedding: Option<Vec<f32>>| {
            embedding.ok_or_else(|| {
                RagSearchError::Retrieval(format!(
                    "strategy '{}' requires a query embedding",
                    strategy
                ))
            })
        };

        Ok(match strategy {
            Strategy::Keyword => SearchRequest::Keyword {
                query: query.to_string(),
            },
            Strategy::Vector => SearchRequest::Vector {
                vector: need_vector(embedding)?,
            },
            Strategy::SparseExpansion => SearchRequest::SparseExpansion {
                query: query.to_string(),
            },
            Strategy::FusedRank => SearchRequest::FusedRank {
                query: query.to_string(),
                vector: need_vector(embedding)?,
                rank_constant: tuning.rrf_rank_constant,
                window_size: tuning.rrf_window_size,
            },
            Strategy::HybridWeighted => SearchRequest::HybridWeighted {
                query: query.to_string(),
                vector: need_vector(embedding)?,
                bm25_boost: tuning.bm25_boost,
                knn_boost: tuning.knn_boost,
            },
        })
    }

    /// Strategy this request was built for
    pub fn strategy(&self) -> Strategy {
        match self {
            SearchRequest::Keyword { .. } => Strategy::Keyword,
            SearchRequest::Vector { .. } => Strategy::Vector,
            SearchRequest::SparseExpansion { .. } => Strategy::SparseExpansion,
            SearchRequest::FusedRank { .. } => Strategy::FusedRank,
            SearchRequest::HybridWeighted { .. } => Strategy::HybridWeighted,
        }
    }

    /// Render the engine JSON body for this request.
    ///
    /// The assembled body is logged at debug level for diagnostics.
    pub fn body(&self, engine: &EngineConfig) -> Value {
        let body = match self {
            SearchRequest::Keyword { query } => json!({
                "size": RESULT_SIZE,
                "query": {
                    "bool": {
                        "should": [
                            {
                                "query_string": {
                                    "default_field": engine.body_field,
                                    "query": query,
                                }
                            }
                        ]
                    }
                }
            }),
            SearchRequest::Vector { vector } => json!({
                "query": {
                    "nested": {
                        "path": "passages",
                        "query": {
                            "knn": {
                                "query_vector": vector,
                                "field": PASSAGES_VECTOR_FIELD,
                                "num_candidates": 2,
                            }
                        },
                        "inner_hits": {
                            "_source": ["passages.text"]
                        }
                    }
                }
            }),
            SearchRequest::SparseExpansion { query } => json!({
                "size": RESULT_SIZE,
                "query": Self::sparse_clause(engine, query),
            }),
            SearchRequest::FusedRank {
                query,
                vector,
                rank_constant,
                window_size,
            } => json!({
                "sub_searches": [
                    {
                        "query": {
                            "match": {
                                engine.body_field.as_str(): query,
                            }
                        }
                    },
                    {
                        "query": {
                            "nested": {
                                "path": "passages",
                                "query": {
                                    "knn": {
                                        "query_vector": vector,
                                        "field": PASSAGES_VECTOR_FIELD,
                                        "num_candidates": 50,
                                    }
                                }
                            }
                        }
                    },
                    {
                        "query": Self::sparse_clause(engine, query),
                    }
                ],
                "rank": {
                    "rrf": {
                        "window_size": window_size,
                        "rank_constant": rank_constant,
                    }
                }
            }),
            SearchRequest::HybridWeighted {
                query,
                vector,
                bm25_boost,
                knn_boost,
            } => json!({
                "query": {
                    "bool": {
                        "must": {
                            "match": {
                                engine.relevancy_field.as_str(): {
                                    "query": query,
                                    "boost": bm25_boost,
                                }
                            }
                        },
                        "filter": []
                    }
                },
                "knn": {
                    "field": engine.dense_vector_field,
                    "k": 10,
                    "num_candidates": 100,
                    "query_vector": vector,
                    "boost": knn_boost,
                }
            }),
        };

        tracing::debug!(
            strategy = %self.strategy(),
            body = %body,
            "assembled search request"
        );

        body
    }

    /// Nested sparse-expansion clause shared by the sparse and fused strategies
    fn sparse_clause(engine: &EngineConfig, query: &str) -> Value {
        json!({
            "nested": {
                "path": "passages",
                "query": {
                    "bool": {
                        "should": [
                            {
                                "text_expansion": {
                                    PASSAGES_SPARSE_FIELD: {
                                        "model_id": engine.sparse_model,
                                        "model_text": query,
                                    }
                                }
                            }
                        ]
                    }
                }
            }
        })
    }
}
