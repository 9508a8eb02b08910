//! Search domain module.
//!
//! Conditions accumulated over a chat, the restaurant record shown to the
//! client, and the pure scoring that ranks candidates.
//!
//! # Components
//!
//! - `Conditions` - Mergeable, fingerprinted condition set
//! - `RestaurantCandidate` / `ScoredRestaurant` - Normalized venue records
//! - `ScoringEngine` - Deterministic ranking with templated reasons
//! - `SearchPage` - One window of a cached provider result set

mod conditions;
mod errors;
pub mod messages;
mod page;
mod restaurant;
mod scoring;

pub use conditions::Conditions;
pub use errors::{ExtractionFailure, SearchError};
pub use page::SearchPage;
pub use restaurant::{
    price_level_text, OpeningHours, PriceLevel, RestaurantCandidate, ScoredRestaurant,
    NO_PRICE_INFO,
};
pub use scoring::{budget_tier, ScoringEngine};
