//! Reservation-specific error types.

use thiserror::Error;

use super::messages;
use crate::domain::foundation::ValidationError;

/// Errors surfaced by reservation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    /// Unknown, malformed or expired session id.
    #[error("Reservation session not found: {0}")]
    SessionNotFound(String),

    /// Another step for the same session is in flight.
    #[error("Reservation session is busy: {0}")]
    Conflict(String),

    /// The request itself is unusable (e.g. empty input).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Session store or state machine failure.
    #[error("Session store error: {0}")]
    Store(String),
}

impl ReservationError {
    pub fn session_not_found(id: impl Into<String>) -> Self {
        ReservationError::SessionNotFound(id.into())
    }

    pub fn conflict(id: impl Into<String>) -> Self {
        ReservationError::Conflict(id.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        ReservationError::InvalidRequest(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        ReservationError::Store(message.into())
    }

    /// Message safe to show the user.
    pub fn user_message(&self) -> String {
        match self {
            ReservationError::SessionNotFound(_) => messages::SESSION_NOT_FOUND.to_string(),
            ReservationError::Conflict(_) => messages::CONFLICT.to_string(),
            ReservationError::InvalidRequest(msg) => msg.clone(),
            ReservationError::Store(_) => {
                "予約処理中にエラーが発生しました。もう一度お試しください。".to_string()
            }
        }
    }
}

impl From<ValidationError> for ReservationError {
    fn from(err: ValidationError) -> Self {
        ReservationError::Store(err.to_string())
    }
}
