//! HTTP adapter for reservation endpoints.
//!
//! - `POST /api/reservation/start` - open a session for a venue
//! - `POST /api/reservation/step` - one dialogue turn
//! - `GET /api/reservation/status/:session_id` - committed session state
//! - `POST /api/reservation/cancel/:session_id` - close a session

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CancelResponse, StartReservationRequest, StatusResponse, StepRequest, StepResponse,
};
pub use handlers::ReservationHandlers;
pub use routes::reservation_routes;
