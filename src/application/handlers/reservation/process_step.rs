//! ProcessStepHandler - advances a reservation session by one user turn.
//!
//! The session is locked for the whole turn, including the interpreter
//! call, and the next value is committed only after it validated.

use std::sync::Arc;

use chrono::NaiveDate;

use super::parse_session_id;
use crate::domain::reservation::{
    form, Classified, FieldUpdate, ReservationError, ReservationSession, ReservationStep,
    StepContext, StepInput, StepOutcome,
};
use crate::ports::{FieldHint, FieldKind, InterpretRequest, LanguageInterpreter, ReservationSessionStore, SchemaHint};

/// Fields the interpreter may fill during `datetime_input`.
pub fn reservation_schema(today: NaiveDate) -> SchemaHint {
    SchemaHint::new(vec![
        FieldHint::new(
            "date",
            FieldKind::Date,
            format!("予約日（今日は{}。「明日」「土曜日」などは日付に変換）", today.format("%Y-%m-%d")),
        ),
        FieldHint::new("time", FieldKind::Time, "予約時刻（24時間表記）"),
        FieldHint::new("party_size", FieldKind::Integer, "人数"),
        FieldHint::new("name", FieldKind::Text, "予約者の名前"),
        FieldHint::new("phone", FieldKind::Text, "電話番号"),
        FieldHint::new("email", FieldKind::Text, "メールアドレス"),
        FieldHint::new("special_requests", FieldKind::Text, "特別な要望（個室、誕生日など）"),
    ])
}

#[derive(Debug, Clone)]
pub struct ProcessStepCommand {
    pub session_id: String,
    pub user_input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub outcome: StepOutcome,
    /// The client should discard the session and start over.
    pub restart_needed: bool,
}

impl StepResult {
    fn from_outcome(outcome: StepOutcome) -> Self {
        let restart_needed = matches!(
            outcome.step(),
            ReservationStep::Unavailable | ReservationStep::Error
        );
        Self {
            outcome,
            restart_needed,
        }
    }
}

pub struct ProcessStepHandler {
    store: Arc<dyn ReservationSessionStore>,
    interpreter: Arc<dyn LanguageInterpreter>,
    max_failed_attempts: u32,
}

impl ProcessStepHandler {
    pub fn new(
        store: Arc<dyn ReservationSessionStore>,
        interpreter: Arc<dyn LanguageInterpreter>,
        max_failed_attempts: u32,
    ) -> Self {
        Self {
            store,
            interpreter,
            max_failed_attempts,
        }
    }

    pub async fn handle(&self, cmd: ProcessStepCommand) -> Result<StepResult, ReservationError> {
        self.handle_on(cmd, chrono::Local::now().date_naive()).await
    }

    /// Same as [`handle`](Self::handle) with an explicit local date.
    pub async fn handle_on(
        &self,
        cmd: ProcessStepCommand,
        today: NaiveDate,
    ) -> Result<StepResult, ReservationError> {
        if cmd.session_id.trim().is_empty() {
            return Err(ReservationError::invalid_request("セッションIDが必要です"));
        }
        if cmd.user_input.trim().is_empty() {
            return Err(ReservationError::invalid_request("ユーザー入力が必要です"));
        }
        let id = parse_session_id(&cmd.session_id)?;

        let mut guard = self.store.acquire(&id).await?;
        let before = guard.step();

        let input = match guard.classify(&cmd.user_input) {
            Classified::Ready(input) => input,
            Classified::NeedsInterpretation(text) => self.interpret(&guard, text, today).await,
        };

        let ctx = StepContext {
            today,
            max_failed_attempts: self.max_failed_attempts,
        };
        let (next, outcome) = guard.apply(input, &ctx)?;

        if next.step() != before {
            tracing::info!(
                session_id = %id,
                from = %before,
                to = %next.step(),
                "reservation step transition"
            );
        } else {
            tracing::debug!(session_id = %id, step = %before, error = outcome.is_error(), "reservation step handled");
        }
        *guard = next;

        Ok(StepResult::from_outcome(outcome))
    }

    /// Free text to fields, falling back to local heuristics.
    async fn interpret(&self, session: &ReservationSession, text: String, today: NaiveDate) -> StepInput {
        let mut context = vec![format!("予約先: {}", session.restaurant().name)];
        if let Ok(draft) = serde_json::to_string(session.draft()) {
            if draft != "{}" {
                context.push(format!("入力済みの項目: {}", draft));
            }
        }

        let request = InterpretRequest::new(text.clone(), reservation_schema(today)).with_context(context);
        let update = match self.interpreter.interpret(request).await {
            Ok(fields) => {
                let update = FieldUpdate::from_fields(&fields);
                if update.is_empty() {
                    form::heuristic_fields(&text)
                } else {
                    update
                }
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %session.id(),
                    interpreter = self.interpreter.name(),
                    error = %err,
                    "reservation interpretation failed; using heuristics"
                );
                form::heuristic_fields(&text)
            }
        };

        StepInput::Fields {
            update,
            structured: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{bookable_restaurant, unbookable_restaurant};
    use super::super::{StartReservationCommand, StartReservationHandler};
    use super::*;
    use crate::adapters::nlu::MockInterpreter;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::foundation::ReservationSessionId;
    use crate::domain::reservation::{ConfirmAction, DatetimeOption, DraftDetails};
    use crate::ports::NluError;
    use serde_json::json;
    use std::time::Duration;

    const FORM: &str =
        "日時: 2099-12-24 19:00, 人数: 2名, 名前: 山田太郎, 電話: 090-1234-5678, メール: taro@example.com, 要望: なし";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 12, 1).unwrap()
    }

    struct Fixture {
        store: Arc<InMemorySessionStore>,
        interpreter: MockInterpreter,
        start: StartReservationHandler,
        step: ProcessStepHandler,
    }

    fn fixture_with(interpreter: MockInterpreter, max_failed_attempts: u32) -> Fixture {
        let store = Arc::new(InMemorySessionStore::new(Duration::from_secs(1800)));
        Fixture {
            start: StartReservationHandler::new(store.clone()),
            step: ProcessStepHandler::new(store.clone(), Arc::new(interpreter.clone()), max_failed_attempts),
            store,
            interpreter,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MockInterpreter::new(), 5)
    }

    impl Fixture {
        async fn open(&self) -> String {
            self.start
                .handle(StartReservationCommand {
                    restaurant: bookable_restaurant(),
                    user_id: None,
                })
                .await
                .unwrap()
                .session_id
                .to_string()
        }

        async fn send(&self, session_id: &str, input: &str) -> Result<StepResult, ReservationError> {
            self.step
                .handle_on(
                    ProcessStepCommand {
                        session_id: session_id.to_string(),
                        user_input: input.to_string(),
                    },
                    today(),
                )
                .await
        }
    }

    #[tokio::test]
    async fn full_form_then_execute_completes() {
        let f = fixture();
        let id = f.open().await;

        let confirm = f.send(&id, FORM).await.unwrap();
        assert_eq!(confirm.outcome.step(), ReservationStep::Confirm);
        assert_eq!(confirm.outcome.options().to_vec(), ConfirmAction::options());
        assert!(confirm.outcome.message().contains("2099年12月24日 19:00"));

        let done = f.send(&id, ConfirmAction::Execute.label()).await.unwrap();
        match &done.outcome {
            StepOutcome::Completed { reservation_id, .. } => assert!(reservation_id.starts_with("RES-")),
            other => panic!("expected completion, got {:?}", other),
        }
        assert!(!done.restart_needed);
        assert_eq!(f.interpreter.call_count(), 0);
    }

    #[tokio::test]
    async fn terminal_session_replays_its_outcome() {
        let f = fixture();
        let id = f.open().await;
        f.send(&id, FORM).await.unwrap();
        let done = f.send(&id, ConfirmAction::Execute.label()).await.unwrap();

        let again = f.send(&id, "もう一件").await.unwrap();
        assert_eq!(again, done);
    }

    #[tokio::test]
    async fn form_missing_email_stays_in_datetime_input() {
        let f = fixture();
        let id = f.open().await;

        let result = f
            .send(&id, "日時: 2099-12-24 19:00, 人数: 2名, 名前: 山田太郎, 電話: 090-1234-5678")
            .await
            .unwrap();

        assert_eq!(result.outcome.step(), ReservationStep::DatetimeInput);
        assert!(result.outcome.is_error());
        assert!(result.outcome.message().contains("メールアドレス"));
        let stored = f.store.snapshot(&id.parse().unwrap()).await.unwrap();
        assert_eq!(stored.draft(), &DraftDetails::default());
    }

    #[tokio::test]
    async fn invalid_email_changes_nothing() {
        let f = fixture();
        let id = f.open().await;

        let result = f
            .send(
                &id,
                "日時: 2099-12-24 19:00, 人数: 2名, 名前: 山田太郎, 電話: 090-1234-5678, メール: not-an-email",
            )
            .await
            .unwrap();

        assert_eq!(result.outcome.step(), ReservationStep::DatetimeInput);
        assert!(result.outcome.is_error());
        let stored = f.store.snapshot(&id.parse().unwrap()).await.unwrap();
        assert_eq!(stored.draft().party_size, None);
        assert_eq!(stored.draft().date, None);
    }

    #[tokio::test]
    async fn free_text_goes_through_the_interpreter() {
        let interpreter = MockInterpreter::new().with_reply(json!({
            "date": "2099-12-24",
            "time": "19:00",
            "party_size": 4,
            "name": "佐藤花子",
            "ignored": "x"
        }));
        let f = fixture_with(interpreter, 5);
        let id = f.open().await;

        let result = f.send(&id, "クリスマスイブの夜7時に4人で、佐藤です").await.unwrap();

        assert_eq!(result.outcome.step(), ReservationStep::DatetimeInput);
        assert!(!result.outcome.is_error());
        assert!(result.outcome.message().contains("電話番号"));

        let requests = f.interpreter.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].schema.contains("special_requests"));
        assert!(requests[0].context[0].contains("中華レストラン A"));
        let stored = f.store.snapshot(&id.parse().unwrap()).await.unwrap();
        assert_eq!(stored.draft().party_size, Some(4));
        assert_eq!(stored.draft().name.as_deref(), Some("佐藤花子"));
    }

    #[tokio::test]
    async fn interpreter_failure_falls_back_to_heuristics() {
        let interpreter = MockInterpreter::new().with_error(NluError::Timeout);
        let f = fixture_with(interpreter, 5);
        let id = f.open().await;

        let result = f
            .send(&id, "連絡先は hanako@example.com と 090-1111-2222、3名でお願いします")
            .await
            .unwrap();

        assert_eq!(result.outcome.step(), ReservationStep::DatetimeInput);
        let stored = f.store.snapshot(&id.parse().unwrap()).await.unwrap();
        assert_eq!(stored.draft().email.as_deref(), Some("hanako@example.com"));
        assert_eq!(stored.draft().party_size, Some(3));
    }

    #[tokio::test]
    async fn quick_pick_sets_date_and_time() {
        let f = fixture();
        let id = f.open().await;

        let result = f.send(&id, DatetimeOption::TodayDinner.label()).await.unwrap();

        assert_eq!(result.outcome.step(), ReservationStep::DatetimeInput);
        let stored = f.store.snapshot(&id.parse().unwrap()).await.unwrap();
        assert_eq!(stored.draft().date, Some(today()));
    }

    #[tokio::test]
    async fn repeated_failures_end_in_error() {
        let f = fixture_with(MockInterpreter::new(), 1);
        let id = f.open().await;
        f.send(&id, FORM).await.unwrap();

        let first = f.send(&id, "うーん").await.unwrap();
        assert_eq!(first.outcome.step(), ReservationStep::Confirm);
        assert!(!first.restart_needed);

        let second = f.send(&id, "どうしよう").await.unwrap();
        assert_eq!(second.outcome.step(), ReservationStep::Error);
        assert!(second.restart_needed);
    }

    #[tokio::test]
    async fn unavailable_session_asks_for_restart() {
        let f = fixture();
        let started = f
            .start
            .handle(StartReservationCommand {
                restaurant: unbookable_restaurant(),
                user_id: None,
            })
            .await
            .unwrap();

        let result = f.send(&started.session_id.to_string(), "明日").await.unwrap();

        assert_eq!(result.outcome.step(), ReservationStep::Unavailable);
        assert!(result.restart_needed);
    }

    #[tokio::test]
    async fn unknown_or_malformed_ids_are_not_found() {
        let f = fixture();

        let unknown = f.send(&ReservationSessionId::new().to_string(), "hi").await.unwrap_err();
        assert!(matches!(unknown, ReservationError::SessionNotFound(_)));

        let malformed = f.send("not-a-session", "hi").await.unwrap_err();
        assert!(matches!(malformed, ReservationError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn blank_fields_are_invalid_requests() {
        let f = fixture();
        let id = f.open().await;

        assert_eq!(
            f.send("", "hi").await.unwrap_err(),
            ReservationError::invalid_request("セッションIDが必要です")
        );
        assert_eq!(
            f.send(&id, "  ").await.unwrap_err(),
            ReservationError::invalid_request("ユーザー入力が必要です")
        );
    }

    #[tokio::test]
    async fn held_session_is_a_conflict() {
        let f = fixture();
        let id = f.open().await;
        let _guard = f.store.acquire(&id.parse().unwrap()).await.unwrap();

        let err = f.send(&id, FORM).await.unwrap_err();
        assert!(matches!(err, ReservationError::Conflict(_)));
    }

    #[test]
    fn schema_mentions_today() {
        let schema = reservation_schema(today());
        assert!(schema.fields[0].description.contains("2099-12-01"));
        assert_eq!(schema.field_names().count(), FieldUpdate::FIELDS.len());
    }
}
