//! Places provider adapters.

mod google_places;
mod mock_places;

pub use google_places::{GooglePlacesConfig, GooglePlacesProvider};
pub use mock_places::MockPlacesProvider;
