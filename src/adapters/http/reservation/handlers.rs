//! HTTP handlers for reservation endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{json_rejection, ErrorResponse};
use crate::application::{
    CancelReservationCommand, CancelReservationHandler, GetReservationStatusHandler,
    GetReservationStatusQuery, ProcessStepCommand, ProcessStepHandler, StartReservationCommand,
    StartReservationHandler,
};
use crate::domain::reservation::ReservationError;
use crate::ports::{LanguageInterpreter, ReservationSessionStore};

use super::dto::{CancelResponse, StartReservationRequest, StatusResponse, StepRequest, StepResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ReservationHandlers {
    start_handler: Arc<StartReservationHandler>,
    step_handler: Arc<ProcessStepHandler>,
    status_handler: Arc<GetReservationStatusHandler>,
    cancel_handler: Arc<CancelReservationHandler>,
}

impl ReservationHandlers {
    /// Wires every reservation handler to one session store.
    pub fn new(
        store: Arc<dyn ReservationSessionStore>,
        interpreter: Arc<dyn LanguageInterpreter>,
        max_failed_attempts: u32,
    ) -> Self {
        Self {
            start_handler: Arc::new(StartReservationHandler::new(store.clone())),
            step_handler: Arc::new(ProcessStepHandler::new(
                store.clone(),
                interpreter,
                max_failed_attempts,
            )),
            status_handler: Arc::new(GetReservationStatusHandler::new(store.clone())),
            cancel_handler: Arc::new(CancelReservationHandler::new(store)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/reservation/start - Open a reservation session
pub async fn start_reservation(
    State(handlers): State<ReservationHandlers>,
    payload: Result<Json<StartReservationRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => return json_rejection(rejection),
    };

    let cmd = StartReservationCommand {
        restaurant: req.restaurant.unwrap_or_default(),
        user_id: req.user_id,
    };

    match handlers.start_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(StepResponse::started(&result))).into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

/// POST /api/reservation/step - Process one user turn
pub async fn process_step(
    State(handlers): State<ReservationHandlers>,
    payload: Result<Json<StepRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => return json_rejection(rejection),
    };

    let cmd = ProcessStepCommand {
        session_id: req.session_id.unwrap_or_default(),
        user_input: req.user_input.unwrap_or_default(),
    };

    match handlers.step_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(StepResponse::step(&result))).into_response(),
        Err(e @ ReservationError::SessionNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(StepResponse::session_lost(e.user_message())),
        )
            .into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

/// GET /api/reservation/status/:session_id - Committed session state
pub async fn get_status(
    State(handlers): State<ReservationHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let query = GetReservationStatusQuery { session_id };

    match handlers.status_handler.handle(query).await {
        Ok(status) => (StatusCode::OK, Json(StatusResponse::from(status))).into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

/// POST /api/reservation/cancel/:session_id - Close a session
pub async fn cancel_reservation(
    State(handlers): State<ReservationHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let cmd = CancelReservationCommand { session_id };

    match handlers.cancel_handler.handle(cmd).await {
        Ok(message) => {
            let response = CancelResponse {
                message,
                cancelled: true,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_reservation_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_reservation_error(error: ReservationError) -> Response {
    match &error {
        ReservationError::SessionNotFound(_) => {
            ErrorResponse::not_found(error.user_message()).into_response_with(StatusCode::NOT_FOUND)
        }
        ReservationError::Conflict(_) => {
            ErrorResponse::conflict(error.user_message()).into_response_with(StatusCode::CONFLICT)
        }
        ReservationError::InvalidRequest(_) => {
            ErrorResponse::bad_request(error.user_message()).into_response_with(StatusCode::BAD_REQUEST)
        }
        ReservationError::Store(detail) => {
            tracing::error!(detail = %detail, "reservation store failure");
            ErrorResponse::internal().into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
