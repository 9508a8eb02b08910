//! LLM-backed LanguageInterpreter.
//!
//! Builds an extraction prompt from the schema hint, asks the provider
//! for a JSON object and filters the answer down to the schema fields.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, FieldKind, InterpretRequest, LanguageInterpreter,
    MessageRole, NluError, SchemaHint,
};

/// First `{` through last `}`, across lines.
static JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("json block regex compiles"));

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 600;

/// Interprets text through an [`AIProvider`].
pub struct LlmInterpreter {
    provider: Arc<dyn AIProvider>,
    name: String,
}

impl LlmInterpreter {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        let info = provider.provider_info();
        Self {
            name: format!("{}:{}", info.name, info.model),
            provider,
        }
    }

    fn system_prompt(schema: &SchemaHint) -> String {
        let fields = schema
            .fields
            .iter()
            .map(|field| {
                let kind = match field.kind {
                    FieldKind::Text => "文字列",
                    FieldKind::Integer => "整数",
                    FieldKind::Date => "日付 YYYY-MM-DD",
                    FieldKind::Time => "時刻 HH:MM",
                };
                format!("- {} ({}): {}", field.name, kind, field.description)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "あなたは日本語の入力から情報を抽出するアシスタントです。\n\
             以下の項目を抽出し、JSONオブジェクトだけを返してください。\n\n\
             抽出する項目：\n{}\n\n\
             注意事項：\n\
             - 入力に含まれない項目は出力しないでください\n\
             - 推測での補完は最小限にしてください\n\
             - 参考情報がある場合は、最新の入力を優先して解釈してください",
            fields
        )
    }

    fn user_prompt(request: &InterpretRequest) -> String {
        if request.context.is_empty() {
            return request.text.clone();
        }
        let context = request
            .context
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{}. {}", i + 1, line))
            .collect::<Vec<_>>()
            .join("\n");
        format!("最新の入力: {}\n\n参考情報:\n{}", request.text, context)
    }

    /// Parses the reply, falling back to the first `{...}` block.
    fn parse_reply(content: &str) -> Result<Map<String, Value>, NluError> {
        let trimmed = content.trim();
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
            return Ok(map);
        }

        let block = JSON_BLOCK
            .find(trimmed)
            .ok_or_else(|| NluError::unparseable("no JSON object in reply"))?;
        match serde_json::from_str::<Value>(block.as_str()) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(NluError::unparseable("reply is not a JSON object")),
            Err(e) => Err(NluError::unparseable(e.to_string())),
        }
    }
}

impl From<AIError> for NluError {
    fn from(err: AIError) -> Self {
        match err {
            AIError::Timeout { .. } => NluError::Timeout,
            AIError::Parse(message) => NluError::Unparseable(message),
            other => NluError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl LanguageInterpreter for LlmInterpreter {
    async fn interpret(&self, request: InterpretRequest) -> Result<Map<String, Value>, NluError> {
        let completion = CompletionRequest::new()
            .with_system_prompt(Self::system_prompt(&request.schema))
            .with_message(MessageRole::User, Self::user_prompt(&request))
            .with_temperature(TEMPERATURE)
            .with_max_tokens(MAX_TOKENS)
            .with_json_output();

        let response = self.provider.complete(completion).await.map_err(|e| {
            tracing::warn!(error = %e, interpreter = %self.name, "completion failed");
            NluError::from(e)
        })?;

        let raw = Self::parse_reply(&response.content).map_err(|e| {
            tracing::warn!(error = %e, "interpreter reply could not be parsed");
            e
        })?;
        let fields = request.schema.filter(raw);
        tracing::debug!(
            fields = fields.len(),
            tokens = response.usage.total_tokens,
            finish_reason = ?response.finish_reason,
            "interpreted input"
        );
        Ok(fields)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
