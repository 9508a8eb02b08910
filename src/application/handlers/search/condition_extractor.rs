//! ConditionExtractor - merges one utterance into accumulated conditions.

use std::sync::Arc;

use crate::domain::search::{Conditions, ExtractionFailure};
use crate::ports::{FieldHint, FieldKind, InterpretRequest, LanguageInterpreter, SchemaHint};

/// Fields the interpreter may fill for a search turn.
pub fn conditions_schema() -> SchemaHint {
    SchemaHint::new(vec![
        FieldHint::new(
            "cuisine_type",
            FieldKind::Text,
            "料理のジャンル（中華、和食、イタリアン、フレンチ、居酒屋、カフェ等）",
        ),
        FieldHint::new("location", FieldKind::Text, "場所（渋谷、新宿、銀座等の地名）"),
        FieldHint::new("time", FieldKind::Text, "時間（ランチ、ディナー、または具体的な時間）"),
        FieldHint::new("party_size", FieldKind::Integer, "人数"),
        FieldHint::new("budget", FieldKind::Text, "予算感（安い、普通、高級、または具体的な金額）"),
        FieldHint::new(
            "atmosphere",
            FieldKind::Text,
            "雰囲気（静か、賑やか、カジュアル、フォーマル、おしゃれ等）",
        ),
        FieldHint::new(
            "special_requirements",
            FieldKind::Text,
            "特別な要求（個室、禁煙、お酒、デート向け等）",
        ),
    ])
}

pub struct ConditionExtractor {
    interpreter: Arc<dyn LanguageInterpreter>,
}

impl ConditionExtractor {
    pub fn new(interpreter: Arc<dyn LanguageInterpreter>) -> Self {
        Self { interpreter }
    }

    /// Extracts conditions from `utterance` and overlays them on `prior`.
    ///
    /// `history` holds the earlier utterances of the chat, oldest first.
    /// An empty utterance returns `prior` without calling the interpreter.
    pub async fn extract(
        &self,
        utterance: &str,
        history: &[String],
        prior: &Conditions,
    ) -> Result<Conditions, ExtractionFailure> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Ok(prior.clone());
        }

        let mut context: Vec<String> = history
            .iter()
            .map(|turn| turn.trim())
            .filter(|turn| !turn.is_empty())
            .map(str::to_string)
            .collect();
        if !prior.is_empty() {
            let json = serde_json::to_string(prior).unwrap_or_default();
            context.push(format!(
                "前回の検索条件: {}（言及されていない条件は引き継がれます）",
                json
            ));
        }

        let request = InterpretRequest::new(utterance, conditions_schema()).with_context(context);
        let fields = self
            .interpreter
            .interpret(request)
            .await
            .map_err(|e| ExtractionFailure::new(e.to_string()))?;

        let extracted = Conditions::from_fields(&fields);
        tracing::debug!(extracted = %extracted.describe(), "conditions extracted");
        Ok(prior.merge(&extracted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::nlu::MockInterpreter;
    use crate::ports::NluError;
    use serde_json::json;

    fn extractor(mock: &MockInterpreter) -> ConditionExtractor {
        ConditionExtractor::new(Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn first_turn_extracts_conditions() {
        let mock = MockInterpreter::new().with_reply(json!({
            "cuisine_type": "中華",
            "location": "渋谷",
            "atmosphere": "静か"
        }));

        let conditions = extractor(&mock)
            .extract("渋谷で静かな中華料理", &[], &Conditions::default())
            .await
            .unwrap();

        assert_eq!(conditions.cuisine_type.as_deref(), Some("中華"));
        assert_eq!(conditions.location.as_deref(), Some("渋谷"));
        assert_eq!(conditions.atmosphere.as_deref(), Some("静か"));
    }

    #[tokio::test]
    async fn later_turn_keeps_unmentioned_fields() {
        let mock = MockInterpreter::new().with_reply(json!({"party_size": "3名"}));
        let prior = Conditions {
            cuisine_type: Some("中華".to_string()),
            location: Some("渋谷".to_string()),
            ..Default::default()
        };

        let conditions = extractor(&mock)
            .extract("3人です", &["渋谷で中華".to_string()], &prior)
            .await
            .unwrap();

        assert_eq!(conditions.cuisine_type.as_deref(), Some("中華"));
        assert_eq!(conditions.location.as_deref(), Some("渋谷"));
        assert_eq!(conditions.party_size, Some(3));
    }

    #[tokio::test]
    async fn explicit_override_replaces_prior_value() {
        let mock = MockInterpreter::new().with_reply(json!({"location": "新宿"}));
        let prior = Conditions {
            location: Some("渋谷".to_string()),
            ..Default::default()
        };

        let conditions = extractor(&mock).extract("やっぱり新宿で", &[], &prior).await.unwrap();

        assert_eq!(conditions.location.as_deref(), Some("新宿"));
    }

    #[tokio::test]
    async fn empty_utterance_returns_prior_without_calling_interpreter() {
        let mock = MockInterpreter::new();
        let prior = Conditions {
            cuisine_type: Some("和食".to_string()),
            ..Default::default()
        };

        let conditions = extractor(&mock).extract("   ", &[], &prior).await.unwrap();

        assert_eq!(conditions, prior);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn interpreter_failure_is_extraction_failure() {
        let mock = MockInterpreter::new().with_error(NluError::Timeout);

        let err = extractor(&mock)
            .extract("渋谷", &[], &Conditions::default())
            .await
            .unwrap_err();

        assert!(err.reason.contains("timed out"));
    }

    #[tokio::test]
    async fn invalid_party_size_is_dropped() {
        let mock = MockInterpreter::new().with_reply(json!({"party_size": 0, "location": "銀座"}));

        let conditions = extractor(&mock)
            .extract("銀座で0人", &[], &Conditions::default())
            .await
            .unwrap();

        assert_eq!(conditions.party_size, None);
        assert_eq!(conditions.location.as_deref(), Some("銀座"));
    }

    #[tokio::test]
    async fn context_carries_history_and_prior_conditions() {
        let mock = MockInterpreter::new();
        let prior = Conditions {
            cuisine_type: Some("フレンチ".to_string()),
            ..Default::default()
        };

        extractor(&mock)
            .extract("予算は5000円", &["新宿のフレンチ".to_string()], &prior)
            .await
            .unwrap();

        let request = &mock.requests()[0];
        assert_eq!(request.context[0], "新宿のフレンチ");
        assert!(request.context[1].starts_with("前回の検索条件: "));
        assert!(request.context[1].contains("フレンチ"));
    }

    #[test]
    fn schema_covers_every_condition_field() {
        let schema = conditions_schema();
        for field in Conditions::FIELDS {
            assert!(schema.contains(field), "missing {}", field);
        }
    }
}
