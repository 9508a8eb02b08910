//! Request/response bodies for reservation endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{ReservationStatus, StartReservationResult, StepResult};
use crate::domain::foundation::lenient;
use crate::domain::reservation::{DraftDetails, ReservationStep, StepOutcome};
use crate::domain::search::RestaurantCandidate;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StartReservationRequest {
    pub restaurant: Option<RestaurantCandidate>,
    #[serde(deserialize_with = "lenient::text")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StepRequest {
    #[serde(deserialize_with = "lenient::text")]
    pub session_id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub user_input: Option<String>,
}

/// Reply to a reservation turn.
///
/// Situational flags are only present when they apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub step: ReservationStep,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_needed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
}

impl StepResponse {
    fn from_outcome(outcome: &StepOutcome) -> Self {
        let mut response = Self {
            session_id: None,
            step: outcome.step(),
            message: outcome.message().to_string(),
            options: outcome.options().to_vec(),
            error: None,
            success: None,
            cancelled: None,
            restart_needed: None,
            reservation_id: None,
        };
        match outcome {
            StepOutcome::Completed { reservation_id, .. } => {
                response.success = Some(true);
                response.reservation_id = Some(reservation_id.clone());
            }
            StepOutcome::Cancelled { .. } => response.cancelled = Some(true),
            other if other.is_error() => response.error = Some(true),
            _ => {}
        }
        response
    }

    pub fn started(result: &StartReservationResult) -> Self {
        Self {
            session_id: Some(result.session_id.to_string()),
            ..Self::from_outcome(&result.outcome)
        }
    }

    pub fn step(result: &StepResult) -> Self {
        let mut response = Self::from_outcome(&result.outcome);
        if result.restart_needed {
            response.restart_needed = Some(true);
        }
        response
    }

    /// The session is gone; the client has to start over.
    pub fn session_lost(message: impl Into<String>) -> Self {
        Self {
            session_id: None,
            step: ReservationStep::Error,
            message: message.into(),
            options: Vec::new(),
            error: Some(true),
            success: None,
            cancelled: None,
            restart_needed: Some(true),
            reservation_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session_id: String,
    pub step: ReservationStep,
    pub data: DraftDetails,
    pub restaurant: RestaurantCandidate,
}

impl From<ReservationStatus> for StatusResponse {
    fn from(status: ReservationStatus) -> Self {
        Self {
            session_id: status.session_id.to_string(),
            step: status.step,
            data: status.draft,
            restaurant: status.restaurant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub message: String,
    pub cancelled: bool,
}
