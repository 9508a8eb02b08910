//! HTTP adapters - REST API implementations.
//!
//! Each area has its own adapter module; [`api_router`] mounts them all
//! under `/api` and [`with_middleware`] adds tracing, CORS and timeouts.

mod error;
pub mod health;
pub mod reservation;
pub mod search;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use error::ErrorResponse;
pub use health::{health_routes, HealthState};
pub use reservation::{reservation_routes, ReservationHandlers};
pub use search::{search_routes, SearchHandlers};

/// Everything the API needs, already wired to adapters.
#[derive(Clone)]
pub struct ApiState {
    pub search: SearchHandlers,
    pub reservation: ReservationHandlers,
    pub health: HealthState,
}

/// All endpoints under `/api`, unknown routes answering 404 JSON.
pub fn api_router(state: ApiState) -> Router {
    let api = Router::new()
        .merge(search_routes(state.search))
        .merge(reservation_routes(state.reservation))
        .merge(health_routes(state.health));

    Router::new()
        .nest("/api", api)
        .fallback(error::route_not_found)
}

/// Adds request tracing, CORS and the request timeout.
pub fn with_middleware(router: Router, server: &ServerConfig) -> Router {
    router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
