//! Result of one reservation turn.

use super::ReservationStep;

/// What the user sees after a turn.
///
/// Each variant fixes which situational flags the client receives; the
/// HTTP layer flattens it into the optional-field response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Normal prompt, possibly after a transition.
    Prompt {
        step: ReservationStep,
        message: String,
        options: Vec<String>,
    },
    /// Input rejected; the session did not move.
    Retry {
        step: ReservationStep,
        message: String,
        options: Vec<String>,
    },
    /// Reservation request submitted.
    Completed {
        message: String,
        reservation_id: String,
    },
    Cancelled {
        message: String,
    },
    /// Venue cannot be booked here; the client must start over elsewhere.
    Unavailable {
        message: String,
    },
    /// Session gave up after repeated bad input.
    Failed {
        message: String,
    },
}

impl StepOutcome {
    pub fn step(&self) -> ReservationStep {
        match self {
            StepOutcome::Prompt { step, .. } | StepOutcome::Retry { step, .. } => *step,
            StepOutcome::Completed { .. } => ReservationStep::Completed,
            StepOutcome::Cancelled { .. } => ReservationStep::Cancelled,
            StepOutcome::Unavailable { .. } => ReservationStep::Unavailable,
            StepOutcome::Failed { .. } => ReservationStep::Error,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            StepOutcome::Prompt { message, .. }
            | StepOutcome::Retry { message, .. }
            | StepOutcome::Completed { message, .. }
            | StepOutcome::Cancelled { message }
            | StepOutcome::Unavailable { message }
            | StepOutcome::Failed { message } => message,
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            StepOutcome::Prompt { options, .. } | StepOutcome::Retry { options, .. } => options,
            _ => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StepOutcome::Retry { .. } | StepOutcome::Unavailable { .. } | StepOutcome::Failed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_variants_report_their_step() {
        let done = StepOutcome::Completed {
            message: "ok".into(),
            reservation_id: "RES-1".into(),
        };
        assert_eq!(done.step(), ReservationStep::Completed);
        assert!(!done.is_error());
        assert!(done.options().is_empty());

        let failed = StepOutcome::Failed { message: "x".into() };
        assert_eq!(failed.step(), ReservationStep::Error);
        assert!(failed.is_error());
    }

    #[test]
    fn retry_keeps_step_and_options() {
        let retry = StepOutcome::Retry {
            step: ReservationStep::Confirm,
            message: "もう一度".into(),
            options: vec!["a".into()],
        };
        assert_eq!(retry.step(), ReservationStep::Confirm);
        assert_eq!(retry.options().to_vec(), vec!["a".to_string()]);
        assert!(retry.is_error());
    }
}
