//! End-to-end pipeline tests against mocked HTTP services
//!
//! The engine and the completion service are both wiremock servers, so
//! these tests pin the wire formats the pipeline emits and consumes.

use async_trait::async_trait;
use ragsearch_core::answer::{AnswerGenerator, Sleeper};
use ragsearch_core::{
    Config, EngineConfig, InferenceEmbedder, LLMServiceConfig, OpenAiClient, Pipeline, SearchClient,
    Strategy, TuningConfig,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// No delays inside tests
struct NoopSleeper;

#[async_trait]
impl Sleeper for NoopSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

fn engine_config(url: &str) -> EngineConfig {
    EngineConfig {
        url: url.to_string(),
        index: "search-corpus".to_string(),
        api_key: None,
        body_field: "body_content".to_string(),
        relevancy_field: "combined_relevancy".to_string(),
        dense_vector_field: "text_embedding.predicted_value".to_string(),
        embedding_model: "dense-embedder".to_string(),
        sparse_model: ".elser_model_2_linux-x86_64".to_string(),
        timeout_secs: 5,
    }
}

fn llm_config(url: &str) -> LLMServiceConfig {
    LLMServiceConfig {
        url: url.to_string(),
        model: "gpt-35-turbo".to_string(),
        api_key: None,
        timeout_secs: 5,
    }
}

fn pipeline_for(engine_url: &str, llm_url: &str) -> Pipeline {
    let engine = engine_config(engine_url);
    let config = Config {
        engine: engine.clone(),
        llm_service: llm_config(llm_url),
        tuning: TuningConfig::default(),
    };

    let search = SearchClient::new(engine.clone()).unwrap();
    let embedder = Arc::new(InferenceEmbedder::new(engine).unwrap());
    let generator = AnswerGenerator::with_sleeper(
        Arc::new(OpenAiClient::new(config.llm_service.clone()).unwrap()),
        Arc::new(NoopSleeper),
    );

    Pipeline::with_components(search, embedder, generator, config)
}

fn completion_response(answer: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [
            {"message": {"role": "assistant", "content": answer}}
        ]
    }))
}

#[tokio::test]
async fn keyword_search_end_to_end() {
    let engine = MockServer::start().await;
    let llm = MockServer::start().await;

    // The exact keyword body the builder must emit
    let expected_body = serde_json::json!({
        "size": 5,
        "query": {
            "bool": {
                "should": [
                    {
                        "query_string": {
                            "default_field": "body_content",
                            "query": "VPN split tunneling",
                        }
                    }
                ]
            }
        }
    });

    Mock::given(method("POST"))
        .and(path("/search-corpus/_search"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "took": 9,
            "hits": {
                "hits": [
                    {"_score": 3.0, "_source": {"body_content": "doc one", "title": "One"}},
                    {"_score": 2.0, "_source": {"body_content": "doc two", "title": "Two"}}
                ]
            }
        })))
        .expect(1)
        .mount(&engine)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion_response("a grounded answer"))
        .expect(2)
        .mount(&llm)
        .await;

    let pipeline = pipeline_for(&engine.uri(), &llm.uri());
    let results = pipeline
        .search("VPN split tunneling", Strategy::Keyword)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    for result in &results {
        assert_eq!(result.answer, "a grounded answer");
        assert_eq!(result.search_ms, 9);
        // No url fields anywhere in the hit -> sentinel
        assert_eq!(result.url, "No URL available");
    }
}

#[tokio::test]
async fn more_than_five_hits_are_capped() {
    let engine = MockServer::start().await;
    let llm = MockServer::start().await;

    let hits: Vec<_> = (0..8)
        .map(|i| {
            serde_json::json!({
                "_score": (8 - i) as f64,
                "_source": {"body_content": format!("doc {}", i)}
            })
        })
        .collect();

    Mock::given(method("POST"))
        .and(path("/search-corpus/_search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"took": 4, "hits": {"hits": hits}})),
        )
        .mount(&engine)
        .await;

    // Exactly five completion calls, one per capped hit
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion_response("answer"))
        .expect(5)
        .mount(&llm)
        .await;

    let pipeline = pipeline_for(&engine.uri(), &llm.uri());
    let results = pipeline
        .search("anything", Strategy::SparseExpansion)
        .await
        .unwrap();

    assert_eq!(results.len(), 5);
}

#[tokio::test]
async fn vector_strategy_embeds_then_searches() {
    let engine = MockServer::start().await;
    let llm = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_ml/trained_models/dense-embedder/_infer"))
        .and(body_json(&serde_json::json!({
            "docs": [{"text_field": "routing basics"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "inference_results": [{"predicted_value": [0.5, 0.25]}]
        })))
        .expect(1)
        .mount(&engine)
        .await;

    // The embedded vector must reach the knn clause
    Mock::given(method("POST"))
        .and(path("/search-corpus/_search"))
        .and(body_partial_json(serde_json::json!({
            "query": {
                "nested": {
                    "path": "passages",
                    "query": {
                        "knn": {
                            "query_vector": [0.5, 0.25],
                            "num_candidates": 2,
                        }
                    }
                }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"took": 2, "hits": {"hits": []}})),
        )
        .expect(1)
        .mount(&engine)
        .await;

    let pipeline = pipeline_for(&engine.uri(), &llm.uri());
    let results = pipeline
        .search("routing basics", Strategy::Vector)
        .await
        .unwrap();

    // Empty engine result is valid and produces no answers
    assert!(results.is_empty());
}

#[tokio::test]
async fn empty_hits_are_a_valid_result() {
    let engine = MockServer::start().await;
    let llm = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search-corpus/_search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"took": 1, "hits": {"hits": []}})),
        )
        .mount(&engine)
        .await;

    let pipeline = pipeline_for(&engine.uri(), &llm.uri());
    let response = pipeline
        .retrieve("nothing here", Strategy::Keyword)
        .await
        .unwrap();

    assert!(response.is_empty());
}

#[tokio::test]
async fn embedding_failure_is_fatal_for_the_attempt() {
    let engine = MockServer::start().await;
    let llm = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_ml/trained_models/dense-embedder/_infer"))
        .respond_with(ResponseTemplate::new(500).set_body_string("inference down"))
        .mount(&engine)
        .await;

    let pipeline = pipeline_for(&engine.uri(), &llm.uri());
    let err = pipeline
        .search("routing basics", Strategy::Vector)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("inference"));
}

#[tokio::test]
async fn ping_fails_against_an_unreachable_engine() {
    let engine = MockServer::start().await;
    let llm = MockServer::start().await;

    // No mock mounted for GET / -> wiremock answers 404
    let pipeline = pipeline_for(&engine.uri(), &llm.uri());
    assert!(pipeline.ping().await.is_err());
}

#[tokio::test]
async fn ping_succeeds_when_the_engine_answers() {
    let engine = MockServer::start().await;
    let llm = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "node-1", "cluster_name": "corpus"
        })))
        .mount(&engine)
        .await;

    let pipeline = pipeline_for(&engine.uri(), &llm.uri());
    pipeline.ping().await.unwrap();
}
