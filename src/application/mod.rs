//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Search turns are stateless commands; reservation turns run against the
//! session store.

pub mod handlers;

pub use handlers::{
    // Search
    ConditionExtractor, PlaceSearchAdapter, PlaceSearchSettings, RunSearchCommand,
    RunSearchHandler, SearchOutcome,
    // Reservation
    CancelReservationCommand, CancelReservationHandler, GetReservationStatusHandler,
    GetReservationStatusQuery, ProcessStepCommand, ProcessStepHandler, ReservationStatus,
    StartReservationCommand, StartReservationHandler, StartReservationResult, StepResult,
};
