//! CancelReservationHandler - closes a session on request.

use std::sync::Arc;

use super::parse_session_id;
use crate::domain::reservation::{messages, ReservationError};
use crate::ports::ReservationSessionStore;

#[derive(Debug, Clone)]
pub struct CancelReservationCommand {
    pub session_id: String,
}

pub struct CancelReservationHandler {
    store: Arc<dyn ReservationSessionStore>,
}

impl CancelReservationHandler {
    pub fn new(store: Arc<dyn ReservationSessionStore>) -> Self {
        Self { store }
    }

    /// Removes the session and returns the closing message.
    pub async fn handle(&self, cmd: CancelReservationCommand) -> Result<String, ReservationError> {
        let id = parse_session_id(&cmd.session_id)?;
        let removed = self.store.remove(&id).await?;

        tracing::info!(session_id = %id, step = %removed.step(), "reservation session closed");
        Ok(messages::SESSION_CLOSED.to_string())
    }
}
