//! Search-specific error types.

use thiserror::Error;

/// Errors surfaced by a search turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The places provider failed or timed out.
    #[error("Places provider unavailable: {0}")]
    PlacesUnavailable(String),

    /// A valid query matched nothing on its first page.
    #[error("No restaurants matched the conditions")]
    NoResults,

    /// A first-page search arrived without any query text.
    #[error("Search query is empty")]
    EmptyQuery,
}

impl SearchError {
    pub fn places_unavailable(detail: impl Into<String>) -> Self {
        SearchError::PlacesUnavailable(detail.into())
    }

    /// Message safe to show the user. Provider detail is never included.
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::PlacesUnavailable(_) => {
                "店舗検索サービスに接続できませんでした。しばらくしてからもう一度お試しください。"
            }
            SearchError::NoResults => "条件に合うお店が見つかりませんでした。",
            SearchError::EmptyQuery => "検索条件を入力してください",
        }
    }
}

/// The NLU could not turn an utterance into conditions.
///
/// Always recovered by falling back to the prior conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Condition extraction failed: {reason}")]
pub struct ExtractionFailure {
    pub reason: String,
}

impl ExtractionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
