//! HTTP routes for search endpoints.

use axum::{routing::post, Router};

use super::handlers::{search_restaurants, SearchHandlers};

/// Creates the search router. Mounted under `/api`.
pub fn search_routes(handlers: SearchHandlers) -> Router {
    Router::new()
        .route("/search", post(search_restaurants))
        .with_state(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::adapters::nlu::MockInterpreter;
    use crate::adapters::places::MockPlacesProvider;
    use crate::application::{ConditionExtractor, PlaceSearchAdapter, PlaceSearchSettings, RunSearchHandler};

    fn router(interpreter: MockInterpreter) -> Router {
        let places = Arc::new(PlaceSearchAdapter::new(
            Arc::new(MockPlacesProvider::new()),
            PlaceSearchSettings::default(),
        ));
        let handler = RunSearchHandler::new(ConditionExtractor::new(Arc::new(interpreter)), places);
        search_routes(SearchHandlers::new(Arc::new(handler)))
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn search_returns_first_page() {
        let interpreter = MockInterpreter::new()
            .with_reply(json!({"cuisine_type": "中華", "location": "渋谷", "atmosphere": "静か"}));

        let response = router(interpreter)
            .oneshot(post_json(json!({"query": "渋谷で静かな中華料理"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["conditions"]["cuisine_type"], "中華");
        assert_eq!(body["restaurants"].as_array().unwrap().len(), 5);
        assert_eq!(body["has_more"], true);
        let first = &body["restaurants"][0];
        assert!(first["place_id"].is_string());
        assert!(first["score"].is_u64());
    }

    #[tokio::test]
    async fn empty_first_page_query_is_400() {
        let response = router(MockInterpreter::new())
            .oneshot(post_json(json!({"query": "  "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "検索条件を入力してください");
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = router(MockInterpreter::new()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid JSON data");
    }

    #[tokio::test]
    async fn missing_content_type_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/search")
            .body(Body::from(json!({"query": "中華"}).to_string()))
            .unwrap();

        let response = router(MockInterpreter::new()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Content-Type must be application/json");
    }
}
