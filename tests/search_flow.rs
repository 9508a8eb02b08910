//! Integration tests for the search endpoint.
//!
//! Drives the full router with the mock places provider and a scripted
//! interpreter:
//! 1. First turn extracts conditions and returns page 1
//! 2. Empty query with `page = 2` continues the same result set
//! 3. Follow-up turns keep earlier conditions

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use dining_concierge::adapters::http::{
    api_router, ApiState, HealthState, ReservationHandlers, SearchHandlers,
};
use dining_concierge::adapters::nlu::MockInterpreter;
use dining_concierge::adapters::places::MockPlacesProvider;
use dining_concierge::adapters::storage::InMemorySessionStore;
use dining_concierge::application::{
    ConditionExtractor, PlaceSearchAdapter, PlaceSearchSettings, RunSearchHandler,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(interpreter: MockInterpreter, places: MockPlacesProvider) -> Router {
    let interpreter = Arc::new(interpreter);
    let adapter = Arc::new(PlaceSearchAdapter::new(Arc::new(places), PlaceSearchSettings::default()));
    let run_search = RunSearchHandler::new(ConditionExtractor::new(interpreter.clone()), adapter);
    let store = Arc::new(InMemorySessionStore::new(Duration::from_secs(1800)));

    api_router(ApiState {
        search: SearchHandlers::new(Arc::new(run_search)),
        reservation: ReservationHandlers::new(store, interpreter, 5),
        health: HealthState {
            nlu: "mock".into(),
            places_is_mock: true,
        },
    })
}

async fn search(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn place_ids(body: &Value) -> Vec<String> {
    body["restaurants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["place_id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn quiet_chinese_in_shibuya_then_next_pages() {
    let interpreter = MockInterpreter::new().with_reply(json!({
        "cuisine_type": "中華",
        "location": "渋谷",
        "atmosphere": "静か"
    }));
    let places = MockPlacesProvider::new();
    let app = app(interpreter.clone(), places.clone());

    let (status, first) = search(
        &app,
        json!({"query": "渋谷で静かな中華料理", "conversation_history": ["渋谷で静かな中華料理"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["conditions"], json!({"cuisine_type": "中華", "location": "渋谷", "atmosphere": "静か"}));
    assert_eq!(first["has_more"], true);
    let page_one = place_ids(&first);
    assert_eq!(page_one.len(), 5);
    for restaurant in first["restaurants"].as_array().unwrap() {
        let score = restaurant["score"].as_u64().unwrap();
        assert!(score <= 100);
        assert!(restaurant["name"].as_str().unwrap().starts_with("中華レストラン"));
    }

    let (status, second) = search(
        &app,
        json!({"query": "", "page": 2, "last_conditions": first["conditions"].clone()}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["conditions"], first["conditions"]);
    assert_eq!(second["has_more"], true);
    let page_two = place_ids(&second);
    assert_eq!(page_two.len(), 5);
    assert!(page_two.iter().all(|id| !page_one.contains(id)));

    let (_, third) = search(
        &app,
        json!({"query": "", "page": 3, "last_conditions": first["conditions"].clone()}),
    )
    .await;
    let page_three = place_ids(&third);
    assert_eq!(page_three.len(), 2);
    assert_eq!(third["has_more"], false);
    assert!(page_three.iter().all(|id| !page_one.contains(id) && !page_two.contains(id)));

    // Continuation pages never re-extract.
    assert_eq!(interpreter.call_count(), 1);
    // The whole set came from one query; three provider pages at most.
    assert!(places.find_calls() <= 3);
}

#[tokio::test]
async fn follow_up_keeps_earlier_conditions() {
    let interpreter = MockInterpreter::new().with_reply(json!({"party_size": 3}));
    let app = app(interpreter.clone(), MockPlacesProvider::new());

    let (status, body) = search(
        &app,
        json!({
            "query": "3人で",
            "conversation_history": ["渋谷で中華", "3人で"],
            "last_conditions": {"cuisine_type": "中華", "location": "渋谷"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conditions"]["cuisine_type"], "中華");
    assert_eq!(body["conditions"]["location"], "渋谷");
    assert_eq!(body["conditions"]["party_size"], 3);

    let request = &interpreter.requests()[0];
    assert!(request.context.iter().any(|line| line.contains("渋谷で中華")));
    assert!(!request.context.iter().any(|line| line == "3人で"));
}

#[tokio::test]
async fn nothing_understood_returns_guidance() {
    let app = app(MockInterpreter::new(), MockPlacesProvider::new());

    let (status, body) = search(&app, json!({"query": "こんにちは"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restaurants"], json!([]));
    assert_eq!(body["has_more"], false);
    assert!(body["message"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn empty_page_two_without_conditions_is_rejected() {
    let app = app(MockInterpreter::new(), MockPlacesProvider::new());

    let (status, body) = search(&app, json!({"query": "", "page": 2})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "検索条件を入力してください");
}
