//! Reservation domain module.
//!
//! The dialogue that takes a user from "book this place" to a submitted
//! reservation request.
//!
//! # States
//!
//! ```text
//! start ─┬─> unavailable
//!        └─> datetime_input ⇄ confirm ─┬─> completed
//!               │                      └─> cancelled
//!               └─> cancelled
//! (any live state) ─> error
//! ```

mod action;
mod availability;
mod details;
mod errors;
pub mod form;
pub mod messages;
mod outcome;
mod session;
mod step;

pub use action::{ConfirmAction, DatetimeOption};
pub use availability::{BookingAvailability, BookingMethod};
pub use details::{DraftDetails, FieldError, FieldUpdate, ReservationDetails, MAX_PARTY_SIZE};
pub use errors::ReservationError;
pub use outcome::StepOutcome;
pub use session::{Classified, ReservationSession, StepContext, StepInput};
pub use step::ReservationStep;
