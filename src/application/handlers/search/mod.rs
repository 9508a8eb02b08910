//! Search turn handlers.

mod condition_extractor;
mod place_search;
mod run_search;

pub use condition_extractor::{conditions_schema, ConditionExtractor};
pub use place_search::{PlaceSearchAdapter, PlaceSearchSettings};
pub use run_search::{RunSearchCommand, RunSearchHandler, SearchOutcome};
