//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, lenient parsing)
//! - `search` - Search conditions, restaurant candidates and scoring
//! - `reservation` - Reservation dialogue state machine and field validation

pub mod foundation;
pub mod reservation;
pub mod search;
