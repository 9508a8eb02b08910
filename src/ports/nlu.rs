//! Language Interpreter Port - natural language to structured fields.
//!
//! The interpreter receives a schema hint describing the fields it may
//! fill. Whatever it returns is filtered down to those fields, so callers
//! never see keys they did not ask for.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// Port for natural language understanding.
#[async_trait]
pub trait LanguageInterpreter: Send + Sync {
    /// Extracts the schema's fields from `request.text`.
    ///
    /// Absent or unknown values are simply missing from the map.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the backing model cannot be reached
    /// - `Timeout` if it does not answer in time
    /// - `Unparseable` if the answer is not a JSON object
    async fn interpret(&self, request: InterpretRequest) -> Result<Map<String, Value>, NluError>;

    /// Short name used by the health endpoint.
    fn name(&self) -> &str;
}

/// One interpretation call.
#[derive(Debug, Clone)]
pub struct InterpretRequest {
    pub text: String,
    pub schema: SchemaHint,
    /// Earlier utterances or known facts, oldest first.
    pub context: Vec<String>,
}

impl InterpretRequest {
    pub fn new(text: impl Into<String>, schema: SchemaHint) -> Self {
        Self {
            text: text.into(),
            schema,
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }
}

/// Kind of value expected for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM`
    Time,
}

/// Describes one extractable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldHint {
    pub name: String,
    pub description: String,
    pub kind: FieldKind,
}

impl FieldHint {
    pub fn new(name: impl Into<String>, kind: FieldKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
        }
    }
}

/// The set of fields an interpretation may produce.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SchemaHint {
    pub fields: Vec<FieldHint>,
}

impl SchemaHint {
    pub fn new(fields: Vec<FieldHint>) -> Self {
        Self { fields }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Drops keys outside the schema and explicit nulls.
    pub fn filter(&self, raw: Map<String, Value>) -> Map<String, Value> {
        raw.into_iter()
            .filter(|(key, value)| self.contains(key) && !value.is_null())
            .collect()
    }
}

/// Language interpreter errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NluError {
    #[error("interpreter unavailable: {0}")]
    Unavailable(String),

    #[error("interpreter timed out")]
    Timeout,

    #[error("unparseable interpreter output: {0}")]
    Unparseable(String),
}

impl NluError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn unparseable(message: impl Into<String>) -> Self {
        Self::Unparseable(message.into())
    }
}
