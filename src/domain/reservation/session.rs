//! ReservationSession - one conversational booking attempt.
//!
//! A session is advanced by [`ReservationSession::apply`], which never
//! mutates in place: it returns the next session value together with the
//! outcome, so the caller can commit both atomically or drop them.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use super::form;
use super::messages;
use super::{
    BookingAvailability, ConfirmAction, DatetimeOption, DraftDetails, FieldError, FieldUpdate,
    ReservationDetails, ReservationStep, StepOutcome,
};
use crate::domain::foundation::{ReservationSessionId, StateMachine, Timestamp, UserId, ValidationError};
use crate::domain::search::RestaurantCandidate;

/// Per-call environment for a step.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Local calendar date; dates before it are rejected.
    pub today: NaiveDate,
    /// Consecutive rejected inputs tolerated before the session errors out.
    pub max_failed_attempts: u32,
}

/// Interpreted user input for the current step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepInput {
    Datetime(DatetimeOption),
    Confirm(ConfirmAction),
    Fields { update: FieldUpdate, structured: bool },
    Unrecognized,
}

/// Result of classifying raw input without the interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Ready(StepInput),
    /// Free text that must go through the language interpreter.
    NeedsInterpretation(String),
}

#[derive(Debug, Clone)]
pub struct ReservationSession {
    id: ReservationSessionId,
    user_id: UserId,
    restaurant: RestaurantCandidate,
    availability: BookingAvailability,
    step: ReservationStep,
    draft: DraftDetails,
    editing: bool,
    failed_attempts: u32,
    reservation_id: Option<String>,
    last_outcome: StepOutcome,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ReservationSession {
    /// Opens a session and runs the availability check.
    ///
    /// Unbookable venues produce a session already in `unavailable`.
    pub fn start(
        id: ReservationSessionId,
        user_id: UserId,
        restaurant: RestaurantCandidate,
    ) -> Result<Self, ValidationError> {
        let availability = BookingAvailability::assess(&restaurant);
        let (step, outcome) = if availability.available {
            let step = ReservationStep::Start.transition_to(ReservationStep::DatetimeInput)?;
            let outcome = StepOutcome::Prompt {
                step,
                message: messages::start(&restaurant),
                options: DatetimeOption::render(&DatetimeOption::QUICK_PICKS),
            };
            (step, outcome)
        } else {
            let step = ReservationStep::Start.transition_to(ReservationStep::Unavailable)?;
            let outcome = StepOutcome::Unavailable {
                message: messages::unavailable(&restaurant, &availability),
            };
            (step, outcome)
        };

        let now = Timestamp::now();
        Ok(Self {
            id,
            user_id,
            restaurant,
            availability,
            step,
            draft: DraftDetails::default(),
            editing: false,
            failed_attempts: 0,
            reservation_id: None,
            last_outcome: outcome,
            created_at: now,
            updated_at: now,
        })
    }

    // ════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════

    pub fn id(&self) -> ReservationSessionId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn restaurant(&self) -> &RestaurantCandidate {
        &self.restaurant
    }

    pub fn availability(&self) -> &BookingAvailability {
        &self.availability
    }

    pub fn step(&self) -> ReservationStep {
        self.step
    }

    pub fn draft(&self) -> &DraftDetails {
        &self.draft
    }

    pub fn reservation_id(&self) -> Option<&str> {
        self.reservation_id.as_deref()
    }

    pub fn last_outcome(&self) -> &StepOutcome {
        &self.last_outcome
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Time of the last committed change.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn is_terminal(&self) -> bool {
        self.step.is_terminal()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Turn processing
    // ════════════════════════════════════════════════════════════════════════

    /// Maps raw input onto the current step's vocabulary.
    pub fn classify(&self, raw: &str) -> Classified {
        match self.step {
            ReservationStep::DatetimeInput => {
                if let Some(update) = form::parse_structured(raw) {
                    return Classified::Ready(StepInput::Fields {
                        update,
                        structured: true,
                    });
                }
                if let Some(option) = DatetimeOption::parse(raw) {
                    return Classified::Ready(StepInput::Datetime(option));
                }
                let text = raw.trim();
                if text.is_empty() {
                    Classified::Ready(StepInput::Unrecognized)
                } else {
                    Classified::NeedsInterpretation(text.to_string())
                }
            }
            ReservationStep::Confirm => Classified::Ready(
                ConfirmAction::parse(raw)
                    .map(StepInput::Confirm)
                    .unwrap_or(StepInput::Unrecognized),
            ),
            _ => Classified::Ready(StepInput::Unrecognized),
        }
    }

    /// Computes the next session value and the outcome to show.
    ///
    /// Terminal sessions return themselves and their stored outcome.
    pub fn apply(
        &self,
        input: StepInput,
        ctx: &StepContext,
    ) -> Result<(ReservationSession, StepOutcome), ValidationError> {
        if self.is_terminal() {
            return Ok((self.clone(), self.last_outcome.clone()));
        }

        let mut next = self.clone();
        let outcome = match (self.step, input) {
            (ReservationStep::DatetimeInput, StepInput::Datetime(option)) => {
                next.choose_datetime_option(option, ctx)?
            }
            (ReservationStep::DatetimeInput, StepInput::Fields { update, structured }) => {
                next.fill_fields(&update, structured, ctx)?
            }
            (ReservationStep::Confirm, StepInput::Confirm(action)) => next.confirm(action)?,
            (ReservationStep::Confirm, _) => {
                next.reject(messages::confirm_not_understood().to_string(), ctx)?
            }
            _ => next.reject(messages::details_not_understood(), ctx)?,
        };

        next.last_outcome = outcome.clone();
        next.updated_at = Timestamp::now();
        Ok((next, outcome))
    }

    fn choose_datetime_option(
        &mut self,
        option: DatetimeOption,
        ctx: &StepContext,
    ) -> Result<StepOutcome, ValidationError> {
        match option {
            DatetimeOption::Cancel => self.cancel(),
            DatetimeOption::BackToConfirm => match self.draft.complete() {
                Some(details) => self.enter_confirm(&details),
                None => {
                    let missing = self.draft.missing_fields();
                    self.reject(messages::back_to_confirm_incomplete(&missing), ctx)
                }
            },
            DatetimeOption::EnterSpecific => {
                let options = self.prompt_options();
                self.succeed(ReservationStep::DatetimeInput, messages::form_guide(), options)
            }
            DatetimeOption::TodayDinner | DatetimeOption::TomorrowLunch | DatetimeOption::ThisWeekend => {
                match quick_pick_slot(option, ctx.today) {
                    Some((date, time)) => {
                        let patch = DraftDetails {
                            date: Some(date),
                            time: Some(time),
                            ..Default::default()
                        };
                        self.draft = self.draft.merged_with(&patch);
                        self.after_draft_change(Some(option.label()))
                    }
                    None => self.reject(messages::details_not_understood(), ctx),
                }
            }
        }
    }

    fn fill_fields(
        &mut self,
        update: &FieldUpdate,
        structured: bool,
        ctx: &StepContext,
    ) -> Result<StepOutcome, ValidationError> {
        if update.is_empty() {
            return self.reject(messages::details_not_understood(), ctx);
        }

        let patch = match update.validate(ctx.today) {
            Ok(patch) => patch,
            Err(errors) => {
                let problems: Vec<String> = errors.iter().map(FieldError::user_message).collect();
                return self.reject(messages::invalid_fields(&problems), ctx);
            }
        };

        // A form must stand on its own, except as a correction to a complete draft.
        if structured && !self.editing && patch.complete().is_none() {
            let missing = patch.missing_fields();
            return self.reject(messages::form_missing(&missing), ctx);
        }

        self.draft = self.draft.merged_with(&patch);
        self.after_draft_change(None)
    }

    fn after_draft_change(&mut self, picked: Option<&str>) -> Result<StepOutcome, ValidationError> {
        match self.draft.complete() {
            Some(details) => self.enter_confirm(&details),
            None => {
                let missing = self.draft.missing_fields();
                let message = match picked {
                    Some(label) => messages::quick_pick_set(label, &missing),
                    None => messages::still_missing(&missing),
                };
                let options = self.prompt_options();
                self.succeed(ReservationStep::DatetimeInput, message, options)
            }
        }
    }

    fn confirm(&mut self, action: ConfirmAction) -> Result<StepOutcome, ValidationError> {
        let details = match self.draft.complete() {
            Some(details) => details,
            None => {
                let missing = self.draft.missing_fields();
                return self.succeed(
                    ReservationStep::DatetimeInput,
                    messages::still_missing(&missing),
                    Vec::new(),
                );
            }
        };

        match action {
            ConfirmAction::Execute => {
                self.move_to(ReservationStep::Completed)?;
                self.failed_attempts = 0;
                let reservation_id = format!("RES-{}", self.id.short_code());
                let message = messages::completed(&self.restaurant, &details, &reservation_id);
                self.reservation_id = Some(reservation_id.clone());
                Ok(StepOutcome::Completed {
                    message,
                    reservation_id,
                })
            }
            ConfirmAction::Edit => {
                self.editing = true;
                self.succeed(
                    ReservationStep::DatetimeInput,
                    messages::edit(&details),
                    DatetimeOption::render(&DatetimeOption::EDITING),
                )
            }
            ConfirmAction::Cancel => self.cancel(),
        }
    }

    fn enter_confirm(&mut self, details: &ReservationDetails) -> Result<StepOutcome, ValidationError> {
        self.editing = false;
        let message = messages::confirmation(&self.restaurant, details);
        self.succeed(ReservationStep::Confirm, message, ConfirmAction::options())
    }

    fn cancel(&mut self) -> Result<StepOutcome, ValidationError> {
        self.move_to(ReservationStep::Cancelled)?;
        self.failed_attempts = 0;
        Ok(StepOutcome::Cancelled {
            message: messages::cancelled().to_string(),
        })
    }

    fn succeed(
        &mut self,
        target: ReservationStep,
        message: String,
        options: Vec<String>,
    ) -> Result<StepOutcome, ValidationError> {
        self.move_to(target)?;
        self.failed_attempts = 0;
        Ok(StepOutcome::Prompt {
            step: target,
            message,
            options,
        })
    }

    /// Counts a rejected input; past the limit the session moves to `error`.
    fn reject(&mut self, message: String, ctx: &StepContext) -> Result<StepOutcome, ValidationError> {
        self.failed_attempts += 1;
        if self.failed_attempts > ctx.max_failed_attempts {
            self.move_to(ReservationStep::Error)?;
            return Ok(StepOutcome::Failed {
                message: messages::too_many_failures().to_string(),
            });
        }
        Ok(StepOutcome::Retry {
            step: self.step,
            message,
            options: self.retry_options(),
        })
    }

    fn move_to(&mut self, target: ReservationStep) -> Result<(), ValidationError> {
        self.step = self.step.transition_to(target)?;
        Ok(())
    }

    fn prompt_options(&self) -> Vec<String> {
        if self.editing {
            DatetimeOption::render(&DatetimeOption::EDITING)
        } else {
            Vec::new()
        }
    }

    fn retry_options(&self) -> Vec<String> {
        match self.step {
            ReservationStep::Confirm => ConfirmAction::options(),
            ReservationStep::DatetimeInput if self.editing => {
                DatetimeOption::render(&DatetimeOption::EDITING)
            }
            ReservationStep::DatetimeInput => DatetimeOption::render(&DatetimeOption::QUICK_PICKS),
            _ => Vec::new(),
        }
    }
}

/// Date and time implied by a quick pick.
fn quick_pick_slot(option: DatetimeOption, today: NaiveDate) -> Option<(NaiveDate, NaiveTime)> {
    match option {
        DatetimeOption::TodayDinner => NaiveTime::from_hms_opt(19, 0, 0).map(|t| (today, t)),
        DatetimeOption::TomorrowLunch => {
            let date = today.succ_opt()?;
            NaiveTime::from_hms_opt(12, 0, 0).map(|t| (date, t))
        }
        DatetimeOption::ThisWeekend => {
            // Saturday is 5 days from Monday
            let until_saturday = (5 + 7 - today.weekday().num_days_from_monday()) % 7;
            let date = today.checked_add_signed(Duration::days(i64::from(until_saturday)))?;
            NaiveTime::from_hms_opt(18, 0, 0).map(|t| (date, t))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_FORM: &str =
        "日時: 2030-12-24 19:00, 人数: 2名, 名前: 山田太郎, 電話: 090-1234-5678, メール: taro@example.com, 要望: なし";

    fn ctx() -> StepContext {
        StepContext {
            today: NaiveDate::from_ymd_opt(2030, 12, 1).unwrap(),
            max_failed_attempts: 3,
        }
    }

    fn bookable() -> RestaurantCandidate {
        RestaurantCandidate {
            place_id: "p1".into(),
            name: "中華 龍苑".into(),
            address: "東京都渋谷区道玄坂1-1".into(),
            phone_number: Some("03-1111-2222".into()),
            ..Default::default()
        }
    }

    fn started() -> ReservationSession {
        ReservationSession::start(ReservationSessionId::new(), UserId::anonymous(), bookable()).unwrap()
    }

    fn send(session: &ReservationSession, raw: &str) -> (ReservationSession, StepOutcome) {
        match session.classify(raw) {
            Classified::Ready(input) => session.apply(input, &ctx()).unwrap(),
            Classified::NeedsInterpretation(text) => session
                .apply(
                    StepInput::Fields {
                        update: form::heuristic_fields(&text),
                        structured: false,
                    },
                    &ctx(),
                )
                .unwrap(),
        }
    }

    fn at_confirm() -> ReservationSession {
        send(&started(), FULL_FORM).0
    }

    #[test]
    fn bookable_start_enters_datetime_input_with_quick_picks() {
        let session = started();
        assert_eq!(session.step(), ReservationStep::DatetimeInput);
        let expected: Vec<String> = ["今日のディナー", "明日のランチ", "今度の週末", "具体的な日時を入力"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(session.last_outcome().options().to_vec(), expected);
    }

    #[test]
    fn unbookable_start_is_unavailable() {
        let restaurant = RestaurantCandidate {
            name: "小さな食堂".into(),
            address: "東京都".into(),
            ..Default::default()
        };
        let session =
            ReservationSession::start(ReservationSessionId::new(), UserId::anonymous(), restaurant).unwrap();
        assert_eq!(session.step(), ReservationStep::Unavailable);
        assert!(session.last_outcome().is_error());
    }

    #[test]
    fn complete_form_moves_to_confirm() {
        let (next, outcome) = send(&started(), FULL_FORM);
        assert_eq!(next.step(), ReservationStep::Confirm);
        assert_eq!(outcome.options().to_vec(), ConfirmAction::options());
        assert!(outcome.message().contains("山田太郎"));
        assert_eq!(next.draft().special_requests, None);
    }

    #[test]
    fn form_missing_required_field_stays_in_datetime_input() {
        let (next, outcome) = send(
            &started(),
            "日時: 2030-12-24 19:00, 人数: 2名, 名前: 山田太郎, 電話: 090-1234-5678",
        );
        assert_eq!(next.step(), ReservationStep::DatetimeInput);
        assert!(outcome.is_error());
        assert!(outcome.message().contains("メールアドレス"));
    }

    #[test]
    fn cancel_words_inside_form_fields_are_data() {
        let requests = FULL_FORM.replace("要望: なし", "要望: キャンセル待ちでも可");
        let (next, _) = send(&started(), &requests);
        assert_eq!(next.step(), ReservationStep::Confirm);
        assert_eq!(next.draft().special_requests.as_deref(), Some("キャンセル待ちでも可"));

        let email = FULL_FORM.replace("taro@example.com", "cancel.team@example.com");
        let (next, _) = send(&started(), &email);
        assert_eq!(next.step(), ReservationStep::Confirm);
        assert_eq!(next.draft().email.as_deref(), Some("cancel.team@example.com"));
    }

    #[test]
    fn incomplete_form_commits_nothing() {
        let (first, outcome) = send(
            &started(),
            "日時: 2030-12-24 19:00, 人数: 2名, 名前: 山田太郎, 電話: 090-1234-5678",
        );
        assert!(outcome.is_error());
        assert_eq!(first.draft(), &DraftDetails::default());

        let (second, outcome) = send(&first, "メール: taro@example.com");
        assert_eq!(second.step(), ReservationStep::DatetimeInput);
        assert!(outcome.is_error());
        assert_eq!(second.draft(), &DraftDetails::default());
    }

    #[test]
    fn form_after_quick_pick_must_still_be_complete() {
        let (picked, _) = send(&started(), "明日のランチ");
        let (next, outcome) = send(
            &picked,
            "人数: 2名, 名前: 山田太郎, 電話: 090-1234-5678, メール: taro@example.com",
        );
        assert_eq!(next.step(), ReservationStep::DatetimeInput);
        assert!(outcome.message().contains("日時"));
        assert_eq!(next.draft(), picked.draft());
    }

    #[test]
    fn invalid_email_rejects_whole_input() {
        let session = started();
        let (next, outcome) = send(
            &session,
            "日時: 2030-12-24 19:00, 人数: 2名, 名前: 山田太郎, 電話: 090-1234-5678, メール: not-an-email",
        );
        assert_eq!(next.step(), ReservationStep::DatetimeInput);
        assert!(matches!(outcome, StepOutcome::Retry { .. }));
        assert_eq!(next.draft(), &DraftDetails::default());
    }

    #[test]
    fn past_date_is_rejected() {
        let (next, outcome) = send(&started(), "日時: 2030-11-30 19:00");
        assert!(outcome.is_error());
        assert_eq!(next.draft().date, None);
    }

    #[test]
    fn free_text_accumulates_fields() {
        let (next, outcome) = send(&started(), "2名で、090-1111-2222、hanako@example.jp");
        assert_eq!(next.step(), ReservationStep::DatetimeInput);
        assert!(!outcome.is_error());
        assert_eq!(next.draft().party_size, Some(2));
        assert!(outcome.message().contains("日時"));
        assert!(outcome.message().contains("名前"));
    }

    #[test]
    fn quick_pick_sets_date_and_time() {
        let (next, outcome) = send(&started(), "明日のランチ");
        assert_eq!(next.draft().date, NaiveDate::from_ymd_opt(2030, 12, 2));
        assert_eq!(next.draft().time, NaiveTime::from_hms_opt(12, 0, 0));
        assert!(outcome.message().starts_with("📅 「明日のランチ」で承りました。"));
    }

    #[test]
    fn weekend_pick_lands_on_saturday() {
        let (next, _) = send(&started(), "今度の週末");
        assert_eq!(next.draft().date.unwrap().weekday(), chrono::Weekday::Sat);
    }

    #[test]
    fn execute_completes_with_reference() {
        let session = at_confirm();
        let (next, outcome) = send(&session, "✅ 予約を実行する");
        assert_eq!(next.step(), ReservationStep::Completed);
        let expected = format!("RES-{}", session.id().short_code());
        assert_eq!(next.reservation_id(), Some(expected.as_str()));
        assert!(matches!(outcome, StepOutcome::Completed { reservation_id, .. } if reservation_id == expected));
    }

    #[test]
    fn edit_returns_to_datetime_input_keeping_fields() {
        let (next, outcome) = send(&at_confirm(), "📝 修正する");
        assert_eq!(next.step(), ReservationStep::DatetimeInput);
        assert_eq!(next.draft().name.as_deref(), Some("山田太郎"));
        assert_eq!(
            outcome.options().to_vec(),
            vec!["🔙 確認画面に戻る".to_string(), "❌ キャンセル".to_string()]
        );

        let (edited, outcome) = send(&next, "人数: 4名");
        assert_eq!(edited.step(), ReservationStep::Confirm);
        assert!(outcome.message().contains("👥 **人数**: 4名"));
    }

    #[test]
    fn back_to_confirm_after_edit() {
        let (editing, _) = send(&at_confirm(), "📝 修正する");
        let (next, _) = send(&editing, "🔙 確認画面に戻る");
        assert_eq!(next.step(), ReservationStep::Confirm);
    }

    #[test]
    fn back_to_confirm_without_complete_draft_is_rejected() {
        let (next, outcome) = send(&started(), "🔙 確認画面に戻る");
        assert_eq!(next.step(), ReservationStep::DatetimeInput);
        assert!(outcome.is_error());
    }

    #[test]
    fn unrecognized_confirm_input_reprompts_with_same_options() {
        let (next, outcome) = send(&at_confirm(), "どうしようかな");
        assert_eq!(next.step(), ReservationStep::Confirm);
        assert!(outcome.is_error());
        assert_eq!(outcome.options().to_vec(), ConfirmAction::options());
    }

    #[test]
    fn negated_or_mixed_confirm_replies_reprompt() {
        for reply in ["実行しないで", "修正はいらない、実行して", "キャンセル待ちでも可"] {
            let (next, outcome) = send(&at_confirm(), reply);
            assert_eq!(next.step(), ReservationStep::Confirm, "{reply}");
            assert!(outcome.is_error());
            assert_eq!(next.reservation_id(), None);
        }
    }

    #[test]
    fn cancel_from_either_live_step() {
        let (a, outcome) = send(&started(), "❌ キャンセル");
        assert_eq!(a.step(), ReservationStep::Cancelled);
        assert!(matches!(outcome, StepOutcome::Cancelled { .. }));

        let (b, _) = send(&at_confirm(), "❌ キャンセル");
        assert_eq!(b.step(), ReservationStep::Cancelled);
    }

    #[test]
    fn terminal_session_replays_stored_outcome() {
        let (done, outcome) = send(&at_confirm(), "✅ 予約を実行する");
        let (again, replay) = send(&done, "✅ 予約を実行する");
        assert_eq!(replay, outcome);
        assert_eq!(again.step(), ReservationStep::Completed);
    }

    #[test]
    fn repeated_failures_move_to_error() {
        let mut session = at_confirm();
        for _ in 0..3 {
            let (next, outcome) = send(&session, "???");
            assert!(matches!(outcome, StepOutcome::Retry { .. }));
            session = next;
        }
        let (next, outcome) = send(&session, "???");
        assert_eq!(next.step(), ReservationStep::Error);
        assert!(matches!(outcome, StepOutcome::Failed { .. }));
    }

    #[test]
    fn success_resets_failure_counter() {
        let (session, _) = send(&started(), "");
        assert_eq!(session.failed_attempts(), 1);
        let (session, _) = send(&session, "明日のランチ");
        assert_eq!(session.failed_attempts(), 0);
    }

    #[test]
    fn free_text_needs_interpretation() {
        assert_eq!(
            started().classify("明日の夜7時に3人で"),
            Classified::NeedsInterpretation("明日の夜7時に3人で".to_string())
        );
    }
}
