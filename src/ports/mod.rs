//! Ports - interfaces between the core and the outside world.
//!
//! - `AIProvider` - LLM completions
//! - `LanguageInterpreter` - natural language to structured fields
//! - `PlacesProvider` - venue search and details
//! - `ReservationSessionStore` - live reservation sessions

mod ai_provider;
mod nlu;
mod places;
mod reservation_session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, TokenUsage,
};
pub use nlu::{FieldHint, FieldKind, InterpretRequest, LanguageInterpreter, NluError, SchemaHint};
pub use places::{PlaceDetails, PlaceQuery, PlacesError, PlacesPage, PlacesProvider, Venue};
pub use reservation_session_store::{ReservationSessionStore, SessionGuard, SessionStoreError};
