//! Scripted LanguageInterpreter for tests and offline runs.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{InterpretRequest, LanguageInterpreter, NluError};

/// Returns queued results in order; an empty map once exhausted.
#[derive(Debug, Clone, Default)]
pub struct MockInterpreter {
    replies: Arc<Mutex<VecDeque<Result<Map<String, Value>, NluError>>>>,
    requests: Arc<Mutex<Vec<InterpretRequest>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply. Non-object values queue an empty map.
    pub fn with_reply(self, reply: Value) -> Self {
        let map = match reply {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        locked(&self.replies).push_back(Ok(map));
        self
    }

    pub fn with_error(self, error: NluError) -> Self {
        locked(&self.replies).push_back(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        locked(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<InterpretRequest> {
        locked(&self.requests).clone()
    }
}

#[async_trait]
impl LanguageInterpreter for MockInterpreter {
    async fn interpret(&self, request: InterpretRequest) -> Result<Map<String, Value>, NluError> {
        let schema = request.schema.clone();
        locked(&self.requests).push(request);
        let reply = locked(&self.replies).pop_front().unwrap_or_else(|| Ok(Map::new()));
        reply.map(|raw| schema.filter(raw))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FieldHint, FieldKind, SchemaHint};
    use serde_json::json;

    fn request() -> InterpretRequest {
        InterpretRequest::new(
            "x",
            SchemaHint::new(vec![FieldHint::new("location", FieldKind::Text, "場所")]),
        )
    }

    #[tokio::test]
    async fn replays_queue_then_empties() {
        let mock = MockInterpreter::new()
            .with_reply(json!({"location": "銀座", "other": 1}))
            .with_error(NluError::Timeout);

        let first = mock.interpret(request()).await.unwrap();
        let second = mock.interpret(request()).await.unwrap_err();
        let third = mock.interpret(request()).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first["location"], json!("銀座"));
        assert_eq!(second, NluError::Timeout);
        assert!(third.is_empty());
        assert_eq!(mock.call_count(), 3);
    }
}
