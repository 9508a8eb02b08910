//! Transition-table trait for lifecycle enums.

use super::ValidationError;

/// A lifecycle enum with an explicit transition table.
///
/// Implementors only describe the table; validated transitions and
/// terminal detection come for free.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if moving from self to target is allowed.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns every state reachable in one move.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs the move, or fails with a `state_transition` validation error.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// A state with no outgoing transitions.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Door {
        Closed,
        Open,
        Removed,
    }

    impl StateMachine for Door {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Door::Closed => vec![Door::Open, Door::Removed],
                Door::Open => vec![Door::Closed],
                Door::Removed => vec![],
            }
        }
    }

    #[test]
    fn allowed_transition_returns_target() {
        assert_eq!(Door::Closed.transition_to(Door::Open), Ok(Door::Open));
    }

    #[test]
    fn disallowed_transition_names_both_states() {
        let err = Door::Open.transition_to(Door::Removed).unwrap_err();
        assert_eq!(err.field(), "state_transition");
        assert!(err.to_string().contains("Open"));
        assert!(err.to_string().contains("Removed"));
    }

    #[test]
    fn terminal_iff_no_outgoing_edges() {
        assert!(Door::Removed.is_terminal());
        assert!(!Door::Closed.is_terminal());
    }
}
