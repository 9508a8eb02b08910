//! Reservation fields: the draft being collected and its validation.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::foundation::lenient;

/// Largest party accepted online.
pub const MAX_PARTY_SIZE: u32 = 99;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y年%m月%d日"];
const TIME_FORMATS: [&str; 3] = ["%H:%M", "%H:%M:%S", "%H時%M分"];

/// Words meaning "no special requests".
const NO_REQUESTS: [&str; 4] = ["なし", "無し", "特になし", "特にありません"];

/// A single rejected field value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("date is in the past: {0}")]
    DateInPast(NaiveDate),

    #[error("invalid time: {0}")]
    InvalidTime(String),

    #[error("invalid party size: {0}")]
    InvalidPartySize(String),

    #[error("party size out of range: {0}")]
    PartySizeOutOfRange(u32),
}

impl FieldError {
    /// Japanese explanation for the re-prompt.
    pub fn user_message(&self) -> String {
        match self {
            FieldError::InvalidEmail(v) => {
                format!("メールアドレスの形式が正しくありません（{}）。例: taro@example.com", v)
            }
            FieldError::InvalidDate(v) => {
                format!("日付の形式が正しくありません（{}）。例: 2025-12-24", v)
            }
            FieldError::DateInPast(d) => {
                format!("{}は過去の日付です。本日以降の日付を指定してください。", d.format("%Y年%m月%d日"))
            }
            FieldError::InvalidTime(v) => {
                format!("時刻の形式が正しくありません（{}）。例: 19:00", v)
            }
            FieldError::InvalidPartySize(v) => {
                format!("人数を正しく認識できませんでした（{}）。1以上の数字で入力してください。", v)
            }
            FieldError::PartySizeOutOfRange(n) => {
                format!("{}名でのオンライン予約はお受けできません。1〜{}名で入力してください。", n, MAX_PARTY_SIZE)
            }
        }
    }
}

/// Unvalidated field values from one user input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdate {
    pub date: Option<String>,
    pub time: Option<String>,
    pub party_size: Option<Value>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub special_requests: Option<String>,
}

impl FieldUpdate {
    /// Field names understood by the reservation form and interpreter.
    pub const FIELDS: [&'static str; 7] = [
        "date",
        "time",
        "party_size",
        "name",
        "phone",
        "email",
        "special_requests",
    ];

    /// Reads a loosely typed field map. A combined `datetime` value fills
    /// whichever of date and time is missing.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let text = |key: &str| fields.get(key).and_then(lenient::text_of);
        let mut update = Self {
            date: text("date"),
            time: text("time"),
            party_size: fields.get("party_size").filter(|v| !v.is_null()).cloned(),
            name: text("name"),
            phone: text("phone"),
            email: text("email"),
            special_requests: text("special_requests"),
        };

        if let Some(combined) = text("datetime") {
            let mut parts = combined.splitn(2, ['T', ' ']);
            let date = parts.next().map(str::to_string);
            let time = parts.next().map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
            update.date = update.date.or(date);
            update.time = update.time.or(time);
        }
        update
    }

    pub fn is_empty(&self) -> bool {
        self == &FieldUpdate::default()
    }

    /// Validates every supplied value.
    ///
    /// All errors are collected; on any error nothing from this update
    /// may be applied.
    pub fn validate(&self, today: NaiveDate) -> Result<DraftDetails, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut patch = DraftDetails::default();

        if let Some(raw) = &self.date {
            match parse_date(raw) {
                Some(date) if date < today => errors.push(FieldError::DateInPast(date)),
                Some(date) => patch.date = Some(date),
                None => errors.push(FieldError::InvalidDate(raw.clone())),
            }
        }

        if let Some(raw) = &self.time {
            match parse_time(raw) {
                Some(time) => patch.time = Some(time),
                None => errors.push(FieldError::InvalidTime(raw.clone())),
            }
        }

        if let Some(raw) = &self.party_size {
            match lenient::positive_int_of(raw) {
                Some(n) if n <= MAX_PARTY_SIZE => patch.party_size = Some(n),
                Some(n) => errors.push(FieldError::PartySizeOutOfRange(n)),
                None => errors.push(FieldError::InvalidPartySize(display_value(raw))),
            }
        }

        if let Some(raw) = &self.email {
            if EMAIL_RE.is_match(raw.trim()) {
                patch.email = Some(raw.trim().to_string());
            } else {
                errors.push(FieldError::InvalidEmail(raw.clone()));
            }
        }

        patch.name = self.name.clone();
        patch.phone = self.phone.clone();
        patch.special_requests = self
            .special_requests
            .clone()
            .filter(|r| !NO_REQUESTS.contains(&r.as_str()));

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    let padded;
    let raw = if raw.ends_with('時') {
        padded = format!("{}00分", raw);
        padded.as_str()
    } else {
        raw
    };
    TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(raw, f).ok())
}

/// Fields collected so far. Any of them may still be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hh_mm")]
    pub time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

impl DraftDetails {
    /// Overlays a validated patch.
    pub fn merged_with(&self, patch: &DraftDetails) -> DraftDetails {
        DraftDetails {
            date: patch.date.or(self.date),
            time: patch.time.or(self.time),
            party_size: patch.party_size.or(self.party_size),
            name: patch.name.clone().or_else(|| self.name.clone()),
            phone: patch.phone.clone().or_else(|| self.phone.clone()),
            email: patch.email.clone().or_else(|| self.email.clone()),
            special_requests: patch
                .special_requests
                .clone()
                .or_else(|| self.special_requests.clone()),
        }
    }

    /// Labels of required fields still missing, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date.is_none() || self.time.is_none() {
            missing.push("日時");
        }
        if self.party_size.is_none() {
            missing.push("人数");
        }
        if self.name.is_none() {
            missing.push("名前");
        }
        if self.phone.is_none() {
            missing.push("電話番号");
        }
        if self.email.is_none() {
            missing.push("メールアドレス");
        }
        missing
    }

    /// The finished details, if every required field is present.
    pub fn complete(&self) -> Option<ReservationDetails> {
        Some(ReservationDetails {
            date: self.date?,
            time: self.time?,
            party_size: self.party_size?,
            name: self.name.clone()?,
            phone: self.phone.clone()?,
            email: self.email.clone()?,
            special_requests: self.special_requests.clone(),
        })
    }
}

/// A draft with every required field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDetails {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: u32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub special_requests: Option<String>,
}

impl ReservationDetails {
    /// `2025年12月24日 19:00`
    pub fn formatted_datetime(&self) -> String {
        format!("{} {}", self.date.format("%Y年%m月%d日"), self.time.format("%H:%M"))
    }

    pub fn special_requests_text(&self) -> &str {
        self.special_requests.as_deref().unwrap_or("なし")
    }
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| super::parse_time(&s)))
    }
}
