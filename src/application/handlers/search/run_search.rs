//! RunSearchHandler - one search turn of the chat.
//!
//! Extract and merge conditions, fetch the requested page, rank it, and
//! compose the reply. Search state travels with the request; the only
//! server-side state is the adapter's result-set cache.

use std::sync::Arc;

use super::{ConditionExtractor, PlaceSearchAdapter};
use crate::domain::search::{messages, Conditions, ScoredRestaurant, ScoringEngine, SearchError};

/// Command for one search turn.
#[derive(Debug, Clone, Default)]
pub struct RunSearchCommand {
    pub query: String,
    /// Earlier utterances of this chat, oldest first.
    pub conversation_history: Vec<String>,
    pub last_conditions: Option<Conditions>,
    /// 1-based page number.
    pub page: u32,
}

/// Reply to a search turn.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub message: String,
    pub conditions: Conditions,
    pub restaurants: Vec<ScoredRestaurant>,
    pub has_more: bool,
}

impl SearchOutcome {
    fn empty(message: String, conditions: Conditions) -> Self {
        Self {
            message,
            conditions,
            restaurants: Vec::new(),
            has_more: false,
        }
    }
}

pub struct RunSearchHandler {
    extractor: ConditionExtractor,
    places: Arc<PlaceSearchAdapter>,
}

impl RunSearchHandler {
    pub fn new(extractor: ConditionExtractor, places: Arc<PlaceSearchAdapter>) -> Self {
        Self { extractor, places }
    }

    pub async fn handle(&self, cmd: RunSearchCommand) -> Result<SearchOutcome, SearchError> {
        let query = cmd.query.trim();
        let page = cmd.page.max(1);
        let prior = cmd.last_conditions.clone().unwrap_or_default();

        // 1. Resolve conditions
        let conditions = if query.is_empty() {
            if page == 1 || cmd.last_conditions.is_none() {
                return Err(SearchError::EmptyQuery);
            }
            prior
        } else {
            let history = history_before(&cmd.conversation_history, query);
            match self.extractor.extract(query, history, &prior).await {
                Ok(conditions) => conditions,
                Err(e) => {
                    tracing::warn!(error = %e, "condition extraction failed, keeping prior conditions");
                    prior
                }
            }
        };

        if conditions.is_empty() {
            return Ok(SearchOutcome::empty(
                messages::NOT_UNDERSTOOD.to_string(),
                conditions,
            ));
        }

        // 2. Fetch the page
        let found = match self.places.search(&conditions, page).await {
            Ok(found) => found,
            Err(SearchError::NoResults) => {
                tracing::info!(page, "search returned no results");
                return Ok(SearchOutcome::empty(messages::not_found(&conditions), conditions));
            }
            Err(e) => return Err(e),
        };

        // 3. Rank and compose
        let restaurants = ScoringEngine::score(&found.restaurants, &conditions);
        let message = if restaurants.is_empty() {
            messages::not_found(&conditions)
        } else {
            messages::found(restaurants.len(), &conditions)
        };
        tracing::info!(
            page,
            count = restaurants.len(),
            has_more = found.has_more,
            "search turn completed"
        );

        Ok(SearchOutcome {
            message,
            conditions,
            restaurants,
            has_more: found.has_more,
        })
    }
}

/// The caller's history minus the current utterance if it was already
/// appended as the last turn.
fn history_before<'a>(history: &'a [String], query: &str) -> &'a [String] {
    match history.split_last() {
        Some((last, earlier)) if last.trim() == query => earlier,
        _ => history,
    }
}
