//! Reservation dialogue states.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where a reservation conversation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStep {
    Start,
    DatetimeInput,
    Confirm,
    Completed,
    Cancelled,
    Unavailable,
    Error,
}

impl ReservationStep {
    /// Wire name, as used in the `step` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStep::Start => "start",
            ReservationStep::DatetimeInput => "datetime_input",
            ReservationStep::Confirm => "confirm",
            ReservationStep::Completed => "completed",
            ReservationStep::Cancelled => "cancelled",
            ReservationStep::Unavailable => "unavailable",
            ReservationStep::Error => "error",
        }
    }
}

impl fmt::Display for ReservationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for ReservationStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ReservationStep::*;
        match self {
            Start => vec![DatetimeInput, Unavailable, Error],
            DatetimeInput => vec![DatetimeInput, Confirm, Cancelled, Error],
            Confirm => vec![Completed, DatetimeInput, Cancelled, Error],
            Completed | Cancelled | Unavailable | Error => vec![],
        }
    }
}
