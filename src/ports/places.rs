//! Places Provider Port - venue search and details lookup.
//!
//! Continuation tokens are opaque to callers; only the provider that
//! issued a token can interpret it.

use async_trait::async_trait;

/// Port for place search providers (Google Places, mock).
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Runs a text search, or continues one when `continuation` is given.
    ///
    /// An empty result is a page with no venues, not an error.
    async fn find(
        &self,
        query: &PlaceQuery,
        continuation: Option<&str>,
    ) -> Result<PlacesPage, PlacesError>;

    /// Fetches contact details for one venue.
    async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError>;

    /// Provider name for logs and health checks.
    fn provider_name(&self) -> &str;

    /// True for the built-in deterministic provider.
    fn is_mock(&self) -> bool {
        false
    }
}

/// Text search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery {
    /// Free-text query, e.g. `中華 静か`.
    pub text: String,
    pub location: String,
}

impl PlaceQuery {
    pub fn new(text: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: location.into(),
        }
    }

    /// Query string as sent to text search engines.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.text, self.location).trim().to_string()
    }
}

/// One page of provider results.
#[derive(Debug, Clone, Default)]
pub struct PlacesPage {
    pub venues: Vec<Venue>,
    pub next_token: Option<String>,
}

/// A venue as the provider reports it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Venue {
    pub place_id: String,
    pub name: String,
    pub formatted_address: Option<String>,
    pub vicinity: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    /// Provider tier 0..=4.
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    /// URL of the first photo, already resolved.
    pub photo_url: Option<String>,
    pub open_now: Option<bool>,
    pub weekday_text: Vec<String>,
}

/// Contact details from a details lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceDetails {
    pub website: Option<String>,
    pub phone_number: Option<String>,
    /// Maps URL.
    pub url: Option<String>,
    pub open_now: Option<bool>,
    pub weekday_text: Vec<String>,
}

/// Places provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacesError {
    #[error("places network error: {0}")]
    Network(String),

    #[error("places request timed out")]
    Timeout,

    /// Non-OK status from the provider API.
    #[error("places API returned {status}: {message}")]
    Status { status: String, message: String },

    #[error("places response parse error: {0}")]
    Parse(String),
}

impl PlacesError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn status(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Status {
            status: status.into(),
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_text_joins_query_and_location() {
        let query = PlaceQuery::new("中華 静か", "渋谷");
        assert_eq!(query.full_text(), "中華 静か 渋谷");
    }

    #[test]
    fn full_text_trims_empty_location() {
        let query = PlaceQuery::new("レストラン", "");
        assert_eq!(query.full_text(), "レストラン");
    }

    #[test]
    fn status_error_displays_status() {
        let err = PlacesError::status("REQUEST_DENIED", "key invalid");
        assert_eq!(err.to_string(), "places API returned REQUEST_DENIED: key invalid");
    }
}
