//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, validation errors, tolerant JSON readers and
//! the state machine trait used by the search and reservation modules.

mod errors;
mod ids;
pub mod lenient;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ReservationSessionId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
