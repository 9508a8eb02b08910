//! GetReservationStatusHandler - read-only view of a session.

use std::sync::Arc;

use super::parse_session_id;
use crate::domain::foundation::ReservationSessionId;
use crate::domain::reservation::{DraftDetails, ReservationError, ReservationStep};
use crate::domain::search::RestaurantCandidate;
use crate::ports::ReservationSessionStore;

#[derive(Debug, Clone)]
pub struct GetReservationStatusQuery {
    pub session_id: String,
}

/// Committed state of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationStatus {
    pub session_id: ReservationSessionId,
    pub step: ReservationStep,
    pub draft: DraftDetails,
    pub restaurant: RestaurantCandidate,
}

pub struct GetReservationStatusHandler {
    store: Arc<dyn ReservationSessionStore>,
}

impl GetReservationStatusHandler {
    pub fn new(store: Arc<dyn ReservationSessionStore>) -> Self {
        Self { store }
    }

    /// Waits for an in-flight step rather than reporting a conflict.
    pub async fn handle(&self, query: GetReservationStatusQuery) -> Result<ReservationStatus, ReservationError> {
        let id = parse_session_id(&query.session_id)?;
        let session = self.store.snapshot(&id).await?;

        Ok(ReservationStatus {
            session_id: session.id(),
            step: session.step(),
            draft: session.draft().clone(),
            restaurant: session.restaurant().clone(),
        })
    }
}
