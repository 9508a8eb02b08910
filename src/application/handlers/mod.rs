//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod reservation;
pub mod search;

pub use reservation::{
    CancelReservationCommand, CancelReservationHandler, GetReservationStatusHandler,
    GetReservationStatusQuery, ProcessStepCommand, ProcessStepHandler, ReservationStatus,
    StartReservationCommand, StartReservationHandler, StartReservationResult, StepResult,
};
pub use search::{
    ConditionExtractor, PlaceSearchAdapter, PlaceSearchSettings, RunSearchCommand,
    RunSearchHandler, SearchOutcome,
};
