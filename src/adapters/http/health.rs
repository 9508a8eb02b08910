//! `GET /api/health` - liveness plus which backends are real.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

const RUNNING: &str = "Restaurant AI API is running";
const MOCK_PLACES_NOTE: &str = " (Google Places API key not configured - using mock data)";

/// What the health endpoint reports about wired adapters.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// Name of the language interpreter in use.
    pub nlu: String,
    pub places_is_mock: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub nlu: String,
    pub places: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub services: ServiceStatus,
    pub message: String,
}

impl From<&HealthState> for HealthResponse {
    fn from(state: &HealthState) -> Self {
        let (places, message) = if state.places_is_mock {
            ("WARNING", format!("{}{}", RUNNING, MOCK_PLACES_NOTE))
        } else {
            ("OK", RUNNING.to_string())
        };
        Self {
            status: "OK".to_string(),
            services: ServiceStatus {
                nlu: "OK".to_string(),
                places: places.to_string(),
            },
            message,
        }
    }
}

pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    tracing::debug!(nlu = %state.nlu, "health check");
    Json(HealthResponse::from(&state))
}

/// Mounted under `/api`.
pub fn health_routes(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}
