//! Request/response bodies for `POST /api/search`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::application::{RunSearchCommand, SearchOutcome};
use crate::domain::foundation::lenient;
use crate::domain::search::{Conditions, ScoredRestaurant};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    #[serde(deserialize_with = "lenient::text")]
    pub query: Option<String>,
    #[serde(deserialize_with = "history_lenient")]
    pub conversation_history: Vec<String>,
    #[serde(deserialize_with = "conditions_lenient")]
    pub last_conditions: Option<Conditions>,
    #[serde(deserialize_with = "lenient::positive_int")]
    pub page: Option<u32>,
}

impl SearchRequest {
    pub fn into_command(self) -> RunSearchCommand {
        RunSearchCommand {
            query: self.query.unwrap_or_default(),
            conversation_history: self.conversation_history,
            last_conditions: self.last_conditions.filter(|c| !c.is_empty()),
            page: self.page.unwrap_or(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub message: String,
    pub conditions: Conditions,
    pub restaurants: Vec<ScoredRestaurant>,
    pub has_more: bool,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            message: outcome.message,
            conditions: outcome.conditions,
            restaurants: outcome.restaurants,
            has_more: outcome.has_more,
        }
    }
}

/// Accepts plain strings or `{content: ...}` chat entries.
fn history_lenient<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .iter()
        .filter_map(|item| match item {
            Value::Object(entry) => entry.get("content").and_then(lenient::text_of),
            other => lenient::text_of(other),
        })
        .collect())
}

fn conditions_lenient<'de, D>(deserializer: D) -> Result<Option<Conditions>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
