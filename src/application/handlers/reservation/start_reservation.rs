//! StartReservationHandler - opens a reservation session for a venue.

use std::sync::Arc;

use crate::domain::foundation::{ReservationSessionId, UserId};
use crate::domain::reservation::{ReservationError, ReservationSession, StepOutcome};
use crate::domain::search::RestaurantCandidate;
use crate::ports::ReservationSessionStore;

#[derive(Debug, Clone)]
pub struct StartReservationCommand {
    pub restaurant: RestaurantCandidate,
    /// Blank or absent means the anonymous user.
    pub user_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StartReservationResult {
    pub session_id: ReservationSessionId,
    pub outcome: StepOutcome,
}

pub struct StartReservationHandler {
    store: Arc<dyn ReservationSessionStore>,
}

impl StartReservationHandler {
    pub fn new(store: Arc<dyn ReservationSessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: StartReservationCommand,
    ) -> Result<StartReservationResult, ReservationError> {
        if cmd.restaurant.name.trim().is_empty() && cmd.restaurant.place_id.trim().is_empty() {
            return Err(ReservationError::invalid_request("レストラン情報が必要です"));
        }

        let user_id = cmd
            .user_id
            .as_deref()
            .and_then(|id| UserId::new(id).ok())
            .unwrap_or_else(UserId::anonymous);

        let session = ReservationSession::start(ReservationSessionId::new(), user_id, cmd.restaurant)?;
        let session_id = session.id();
        let outcome = session.last_outcome().clone();

        // Unavailable sessions are stored too, so later steps can say so.
        self.store.insert(session).await?;

        tracing::info!(
            session_id = %session_id,
            step = %outcome.step(),
            "reservation session started"
        );
        Ok(StartReservationResult {
            session_id,
            outcome,
        })
    }
}
