//! HTTP routes for reservation endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    cancel_reservation, get_status, process_step, start_reservation, ReservationHandlers,
};

/// Creates the reservation router. Mounted under `/api`.
pub fn reservation_routes(handlers: ReservationHandlers) -> Router {
    Router::new()
        .route("/reservation/start", post(start_reservation))
        .route("/reservation/step", post(process_step))
        .route("/reservation/status/:session_id", get(get_status))
        .route("/reservation/cancel/:session_id", post(cancel_reservation))
        .with_state(handlers)
}
