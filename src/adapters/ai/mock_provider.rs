//! Scripted AI provider.
//!
//! Used when no API key is configured and by the interpreter tests. Replies
//! are scripted up front; once the script runs out every completion is an
//! empty JSON object, which the interpreter reads as "nothing understood".

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo, TokenUsage};

const EMPTY_OBJECT: &str = "{}";

#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    script: Arc<Mutex<VecDeque<Result<String, AIError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply body.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        locked(&self.script).push_back(Ok(content.into()));
        self
    }

    /// Queues a failed completion.
    pub fn with_failure(self, error: AIError) -> Self {
        locked(&self.script).push_back(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        locked(&self.requests).len()
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        locked(&self.requests).clone()
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let prompt_chars: usize = request.messages.iter().map(|m| m.content.chars().count()).sum();
        locked(&self.requests).push(request);

        let content = locked(&self.script)
            .pop_front()
            .unwrap_or_else(|| Ok(EMPTY_OBJECT.to_string()))?;

        Ok(CompletionResponse {
            usage: TokenUsage::new(prompt_chars as u32, content.chars().count() as u32),
            content,
            model: "mock-model-1".to_string(),
            finish_reason: FinishReason::Stop,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model-1").with_json_mode(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MessageRole;

    fn ask(text: &str) -> CompletionRequest {
        CompletionRequest::new().with_message(MessageRole::User, text)
    }

    #[tokio::test]
    async fn replays_script_then_answers_empty_object() {
        let provider = MockAIProvider::new()
            .with_reply(r#"{"location":"渋谷"}"#)
            .with_reply(r#"{"cuisine_type":"中華"}"#);

        let first = provider.complete(ask("渋谷で")).await.unwrap();
        let second = provider.complete(ask("中華")).await.unwrap();
        let third = provider.complete(ask("静かな店")).await.unwrap();

        assert_eq!(first.content, r#"{"location":"渋谷"}"#);
        assert_eq!(second.content, r#"{"cuisine_type":"中華"}"#);
        assert_eq!(third.content, "{}");
        assert_eq!(third.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn scripted_failure_is_returned_once() {
        let provider = MockAIProvider::new().with_failure(AIError::rate_limited(30));

        let err = provider.complete(ask("渋谷で")).await.unwrap_err();
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 30 }));
        assert!(provider.complete(ask("渋谷で")).await.is_ok());
    }

    #[tokio::test]
    async fn records_requests() {
        let provider = MockAIProvider::new();

        provider.complete(ask("一件目")).await.unwrap();
        provider.complete(ask("二件目").with_json_output()).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        let requests = provider.requests();
        assert_eq!(requests[0].messages[0].content, "一件目");
        assert!(requests[1].json_output);
    }

    #[tokio::test]
    async fn usage_counts_characters() {
        let provider = MockAIProvider::new().with_reply("{}");
        let response = provider.complete(ask("中華")).await.unwrap();
        assert_eq!(response.usage, TokenUsage::new(2, 2));
    }
}
