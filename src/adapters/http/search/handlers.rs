//! HTTP handlers for search endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{json_rejection, ErrorResponse};
use crate::application::RunSearchHandler;
use crate::domain::search::{Conditions, SearchError};

use super::dto::{SearchRequest, SearchResponse};

#[derive(Clone)]
pub struct SearchHandlers {
    run_search: Arc<RunSearchHandler>,
}

impl SearchHandlers {
    pub fn new(run_search: Arc<RunSearchHandler>) -> Self {
        Self { run_search }
    }
}

/// POST /api/search - One search turn
pub async fn search_restaurants(
    State(handlers): State<SearchHandlers>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => return json_rejection(rejection),
    };

    let cmd = req.into_command();
    tracing::debug!(page = cmd.page, history = cmd.conversation_history.len(), "search request");

    match handlers.run_search.handle(cmd).await {
        Ok(outcome) => (StatusCode::OK, Json(SearchResponse::from(outcome))).into_response(),
        Err(e) => handle_search_error(e),
    }
}

fn handle_search_error(error: SearchError) -> Response {
    match &error {
        SearchError::EmptyQuery => {
            ErrorResponse::bad_request(error.user_message()).into_response_with(StatusCode::BAD_REQUEST)
        }
        SearchError::PlacesUnavailable(detail) => {
            tracing::warn!(detail = %detail, "places provider unavailable");
            ErrorResponse::bad_gateway(error.user_message()).into_response_with(StatusCode::BAD_GATEWAY)
        }
        SearchError::NoResults => {
            let response = SearchResponse {
                message: error.user_message().to_string(),
                conditions: Conditions::default(),
                restaurants: Vec::new(),
                has_more: false,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
    }
}
