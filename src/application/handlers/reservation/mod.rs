//! Reservation command and query handlers.

mod cancel_reservation;
mod get_status;
mod process_step;
mod start_reservation;

pub use cancel_reservation::{CancelReservationCommand, CancelReservationHandler};
pub use get_status::{GetReservationStatusHandler, GetReservationStatusQuery, ReservationStatus};
pub use process_step::{reservation_schema, ProcessStepCommand, ProcessStepHandler, StepResult};
pub use start_reservation::{StartReservationCommand, StartReservationHandler, StartReservationResult};

use crate::domain::foundation::ReservationSessionId;
use crate::domain::reservation::ReservationError;
use crate::ports::SessionStoreError;

impl From<SessionStoreError> for ReservationError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => ReservationError::session_not_found(id.to_string()),
            SessionStoreError::Busy(id) => ReservationError::conflict(id.to_string()),
            SessionStoreError::AlreadyExists(id) => {
                ReservationError::store(format!("duplicate session id {}", id))
            }
        }
    }
}

/// Parses a client-supplied id; malformed ids are simply unknown.
fn parse_session_id(raw: &str) -> Result<ReservationSessionId, ReservationError> {
    raw.parse::<ReservationSessionId>()
        .map_err(|_| ReservationError::session_not_found(raw.trim()))
}
