//! HTTP contract tests for the Snowflake Cortex clients.
//!
//! These tests use wiremock to stand in for the Snowflake REST API and
//! validate request shapes, auth headers, response parsing and error
//! mapping.

mod common;

use common::test_config;
use nyaya::db::{CortexSearchClient, SearchService, SnowflakeConnection};
use nyaya::llm::{cortex::COMPLETE_PATH, CortexCompleteClient, LLMClient};
use nyaya::types::{AppError, CortexModel};
use nyaya::AppState;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/api/v2/databases/LEGAL_DATA_DB/schemas/LEGAL_DATA_SCHEMA/cortex-search-services/LEGAL_JUDGEMENTS_CORTEX_SEARCH_SERVICE:query";

fn clients(server: &MockServer) -> (CortexSearchClient, CortexCompleteClient) {
    let config = test_config(&server.uri(), "");
    let connection = Arc::new(SnowflakeConnection::new(&config.snowflake, "test-token").unwrap());
    (
        CortexSearchClient::new(Arc::clone(&connection), &config.search),
        CortexCompleteClient::new(connection),
    )
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [{"message": {"content": content}}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5}
    })
}

// ============= Cortex Search =============

#[tokio::test]
async fn test_search_sends_expected_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(header(
            "x-snowflake-authorization-token-type",
            "PROGRAMMATIC_ACCESS_TOKEN",
        ))
        .and(body_json(json!({
            "query": "adverse possession by tenant",
            "columns": ["extracted_text"],
            "limit": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"extracted_text": "Case A text..."},
                {"extracted_text": "Case B text..."}
            ],
            "request_id": "abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (search, _) = clients(&server);
    let results = search.search("adverse possession by tenant", 5).await.unwrap();

    assert_eq!(results, vec!["Case A text...", "Case B text..."]);
}

#[tokio::test]
async fn test_search_empty_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let (search, _) = clients(&server);
    assert!(search.search("anything", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_skips_rows_without_text_column() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"case_title": "no text here"},
                {"extracted_text": "kept"},
                {"extracted_text": null}
            ]
        })))
        .mount(&server)
        .await;

    let (search, _) = clients(&server);
    assert_eq!(search.search("q", 5).await.unwrap(), vec!["kept"]);
}

#[tokio::test]
async fn test_search_auth_failure_is_retrieval_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "390303",
            "message": "Invalid OAuth access token."
        })))
        .mount(&server)
        .await;

    let (search, _) = clients(&server);
    let err = search.search("q", 5).await.unwrap_err();

    match err {
        AppError::Retrieval(msg) => {
            assert!(msg.contains("401"));
            assert!(msg.contains("Invalid OAuth access token."));
        }
        other => panic!("expected retrieval error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_timeout_is_retrieval_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), "");
    config.snowflake.request_timeout_secs = 1;
    let connection = Arc::new(SnowflakeConnection::new(&config.snowflake, "t").unwrap());
    let search = CortexSearchClient::new(connection, &config.search);

    let err = search.search("q", 5).await.unwrap_err();
    assert!(matches!(err, AppError::Retrieval(msg) if msg.contains("timed out")));
}

// ============= Cortex Complete =============

#[tokio::test]
async fn test_complete_sends_expected_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETE_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({
            "model": "mixtral-8x7b",
            "messages": [{"role": "user", "content": "Analyze this"}],
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Structured analysis")))
        .expect(1)
        .mount(&server)
        .await;

    let (_, llm) = clients(&server);
    let text = llm
        .complete(CortexModel::Mixtral8x7b, "Analyze this")
        .await
        .unwrap();

    assert_eq!(text, "Structured analysis");
}

#[tokio::test]
async fn test_complete_accepts_event_stream() {
    let server = MockServer::start().await;

    let body = "data: {\"id\":\"1\",\"choices\":[{\"delta\":{\"content\":\"Key \"}}]}\n\n\
                data: {\"id\":\"1\",\"choices\":[{\"delta\":{\"content\":\"principles\"}}]}\n\n";
    Mock::given(method("POST"))
        .and(path(COMPLETE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let (_, llm) = clients(&server);
    let text = llm.complete(CortexModel::MistralLarge, "p").await.unwrap();
    assert_eq!(text, "Key principles");
}

#[tokio::test]
async fn test_complete_server_error_is_generation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let (_, llm) = clients(&server);
    let err = llm.complete(CortexModel::Mistral7b, "p").await.unwrap_err();
    assert!(matches!(err, AppError::Generation(msg) if msg.contains("HTTP 500")));
}

// ============= Wired end to end =============

#[tokio::test]
async fn test_app_state_wires_both_clients_to_one_account() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"extracted_text": "Case A text..."}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Final analysis")))
        .expect(1)
        .mount(&server)
        .await;

    let state = AppState::from_config(test_config(&server.uri(), "")).unwrap();
    let id = state.sessions.create(None, None);
    let outcome = state
        .sessions
        .ask(&id, "Can a tenant claim adverse possession?")
        .await
        .unwrap();

    assert!(!outcome.is_error());
    assert_eq!(outcome.turn.content, "Final analysis");

    let requests = server.received_requests().await.unwrap();
    let completion_body: serde_json::Value = requests
        .iter()
        .find(|r| r.url.path() == COMPLETE_PATH)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .unwrap();
    let prompt = completion_body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("Context: Case A text..."));
    assert_eq!(completion_body["model"], "mistral-large");
}
