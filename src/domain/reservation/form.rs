//! Parsing reservation input that does not need the language interpreter.
//!
//! Two structured shapes are recognized: the chat client's one-line form
//! (`日時: 2025-12-24 19:00, 人数: 2名, 名前: …, 電話: …, メール: …, 要望: …`)
//! and a JSON object keyed by field name. Free text falls through to
//! the interpreter, with [`heuristic_fields`] as the offline fallback.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::FieldUpdate;

static FORM_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(日時|人数|名前|電話|メール|要望)\s*[:：]").expect("form label pattern compiles"));
static FORM_DATETIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"日時\s*[:：]\s*([^,，\n]+)").expect("form datetime pattern compiles"));
static FORM_PARTY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"人数\s*[:：]\s*([^,，\n]+)").expect("form party pattern compiles"));
static FORM_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"名前\s*[:：]\s*([^,，\n]+)").expect("form name pattern compiles"));
static FORM_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"電話\s*[:：]\s*([^,，\n]+)").expect("form phone pattern compiles"));
static FORM_EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"メール\s*[:：]\s*([^,，\n]+)").expect("form email pattern compiles"));
static FORM_REQUESTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"要望\s*[:：]\s*([^,，\n]*)").expect("form requests pattern compiles"));

static EMAIL_FIND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email pattern compiles")
});
static DATE_FIND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}[-/]\d{1,2}[-/]\d{1,2}").expect("date pattern compiles"));
static TIME_FIND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}").expect("time pattern compiles"));
static PARTY_FIND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*(?:名|人)").expect("party pattern compiles"));
static PHONE_FIND_RES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"0[789]0-?\d{4}-?\d{4}").expect("mobile pattern compiles"),
        Regex::new(r"0\d{1,4}-?\d{1,4}-?\d{4}").expect("landline pattern compiles"),
        Regex::new(r"\d{10,11}").expect("digits pattern compiles"),
    ]
});

/// Recognizes a structured payload: a JSON object or the labelled form.
pub fn parse_structured(input: &str) -> Option<FieldUpdate> {
    let trimmed = input.trim();
    if trimmed.starts_with('{') {
        return serde_json::from_str::<Map<String, Value>>(trimmed)
            .ok()
            .map(|fields| FieldUpdate::from_fields(&fields));
    }
    if is_labelled_form(trimmed) {
        return Some(parse_labelled_form(trimmed));
    }
    None
}

/// At least two labels, or a leading `日時:`.
fn is_labelled_form(input: &str) -> bool {
    FORM_LABEL_RE.find_iter(input).count() >= 2
        || FORM_LABEL_RE.find(input).map(|m| m.start() == 0).unwrap_or(false)
}

fn capture(re: &Regex, input: &str) -> Option<String> {
    re.captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_labelled_form(input: &str) -> FieldUpdate {
    let (date, time) = match capture(&FORM_DATETIME_RE, input) {
        Some(raw) => {
            let mut parts = raw.split_whitespace();
            (
                parts.next().map(str::to_string),
                parts.next().map(str::to_string),
            )
        }
        None => (None, None),
    };

    FieldUpdate {
        date,
        time,
        party_size: capture(&FORM_PARTY_RE, input).map(Value::String),
        name: capture(&FORM_NAME_RE, input),
        phone: capture(&FORM_PHONE_RE, input),
        email: capture(&FORM_EMAIL_RE, input),
        special_requests: capture(&FORM_REQUESTS_RE, input),
    }
}

/// Best-effort extraction from free text when the interpreter is down.
///
/// Picks up an email address, a phone number, `N名`/`N人`, an ISO-like
/// date and an `HH:MM` time. Names are never guessed.
pub fn heuristic_fields(input: &str) -> FieldUpdate {
    let email = EMAIL_FIND_RE.find(input).map(|m| m.as_str().to_string());
    let date = DATE_FIND_RE.find(input).map(|m| m.as_str().to_string());
    let time = TIME_FIND_RE.find(input).map(|m| m.as_str().to_string());
    let party_size = PARTY_FIND_RE
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| Value::String(m.as_str().to_string()));

    let mut remainder = input.to_string();
    for taken in [&email, &date, &time].into_iter().flatten() {
        remainder = remainder.replace(taken.as_str(), " ");
    }
    let phone = PHONE_FIND_RES
        .iter()
        .find_map(|re| re.find(&remainder))
        .map(|m| m.as_str().to_string());

    FieldUpdate {
        date,
        time,
        party_size,
        name: None,
        phone,
        email,
        special_requests: None,
    }
}
