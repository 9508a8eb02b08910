//! Quick-pick options offered to the chat client.
//!
//! Clients echo the rendered label back as `user_input`. The labels are
//! wire compatibility only; the dialogue works on the enums.

/// Choices on the confirmation screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Execute,
    Edit,
    Cancel,
}

impl ConfirmAction {
    pub const ALL: [ConfirmAction; 3] = [
        ConfirmAction::Execute,
        ConfirmAction::Edit,
        ConfirmAction::Cancel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConfirmAction::Execute => "✅ 予約を実行する",
            ConfirmAction::Edit => "📝 修正する",
            ConfirmAction::Cancel => "❌ キャンセル",
        }
    }

    /// Recognizes a label or one of a closed set of typed replies.
    ///
    /// The whole input must match; anything else is left for a re-prompt.
    pub fn parse(input: &str) -> Option<Self> {
        let reply = normalize(input);
        Self::ALL
            .into_iter()
            .find(|action| action.label() == input.trim() || action.keywords().contains(&reply.as_str()))
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            ConfirmAction::Execute => &[
                "✅",
                "予約を実行する",
                "予約を実行",
                "実行",
                "実行する",
                "実行して",
                "予約する",
                "はい",
                "はい、お願いします",
                "お願いします",
                "ok",
                "yes",
            ],
            ConfirmAction::Edit => &["📝", "修正する", "修正", "修正したい", "修正します", "edit"],
            ConfirmAction::Cancel => CANCEL_KEYWORDS,
        }
    }

    /// Rendered option list, in display order.
    pub fn options() -> Vec<String> {
        Self::ALL.iter().map(|a| a.label().to_string()).collect()
    }
}

/// Choices while collecting date, time and contact details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatetimeOption {
    TodayDinner,
    TomorrowLunch,
    ThisWeekend,
    EnterSpecific,
    BackToConfirm,
    Cancel,
}

impl DatetimeOption {
    /// Options shown when collection starts.
    pub const QUICK_PICKS: [DatetimeOption; 4] = [
        DatetimeOption::TodayDinner,
        DatetimeOption::TomorrowLunch,
        DatetimeOption::ThisWeekend,
        DatetimeOption::EnterSpecific,
    ];

    /// Options shown while editing a completed draft.
    pub const EDITING: [DatetimeOption; 2] = [DatetimeOption::BackToConfirm, DatetimeOption::Cancel];

    pub fn label(&self) -> &'static str {
        match self {
            DatetimeOption::TodayDinner => "今日のディナー",
            DatetimeOption::TomorrowLunch => "明日のランチ",
            DatetimeOption::ThisWeekend => "今度の週末",
            DatetimeOption::EnterSpecific => "具体的な日時を入力",
            DatetimeOption::BackToConfirm => "🔙 確認画面に戻る",
            DatetimeOption::Cancel => "❌ キャンセル",
        }
    }

    /// Recognizes an exact label, the bare back marker, or a cancel reply.
    pub fn parse(input: &str) -> Option<Self> {
        let text = input.trim();
        let reply = normalize(input);
        if text == DatetimeOption::Cancel.label() || CANCEL_KEYWORDS.contains(&reply.as_str()) {
            return Some(DatetimeOption::Cancel);
        }
        if matches!(reply.as_str(), "🔙" | "確認画面に戻る" | "戻る") {
            return Some(DatetimeOption::BackToConfirm);
        }
        Self::QUICK_PICKS
            .into_iter()
            .chain([DatetimeOption::BackToConfirm])
            .find(|o| o.label() == text)
    }

    pub fn render(options: &[DatetimeOption]) -> Vec<String> {
        options.iter().map(|o| o.label().to_string()).collect()
    }
}

const CANCEL_KEYWORDS: &[&str] = &[
    "❌",
    "キャンセル",
    "キャンセルする",
    "キャンセルします",
    "キャンセルして",
    "キャンセルで",
    "やっぱりキャンセル",
    "やっぱりキャンセルで",
    "cancel",
];

/// Trimmed, lowercased, without trailing punctuation.
fn normalize(input: &str) -> String {
    input
        .trim()
        .trim_end_matches(&['。', '！', '!', '.', '、'][..])
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_labels_round_trip() {
        for action in ConfirmAction::ALL {
            assert_eq!(ConfirmAction::parse(action.label()), Some(action));
        }
    }

    #[test]
    fn confirm_keywords() {
        assert_eq!(ConfirmAction::parse("はい、お願いします"), Some(ConfirmAction::Execute));
        assert_eq!(ConfirmAction::parse("OK"), Some(ConfirmAction::Execute));
        assert_eq!(ConfirmAction::parse("修正したい"), Some(ConfirmAction::Edit));
        assert_eq!(ConfirmAction::parse("やっぱりキャンセルで"), Some(ConfirmAction::Cancel));
        assert_eq!(ConfirmAction::parse("うーん"), None);
        assert_eq!(ConfirmAction::parse("bookmark"), None);
    }

    #[test]
    fn confirm_requires_the_whole_reply() {
        assert_eq!(ConfirmAction::parse("実行しないで"), None);
        assert_eq!(ConfirmAction::parse("修正はいらない、実行して"), None);
        assert_eq!(ConfirmAction::parse("credit"), None);
        assert_eq!(ConfirmAction::parse("キャンセル待ちでも可"), None);
        assert_eq!(ConfirmAction::parse(" 実行して。"), Some(ConfirmAction::Execute));
        assert_eq!(ConfirmAction::parse("Edit"), Some(ConfirmAction::Edit));
    }

    #[test]
    fn confirm_options_in_display_order() {
        assert_eq!(
            ConfirmAction::options(),
            vec!["✅ 予約を実行する", "📝 修正する", "❌ キャンセル"]
        );
    }

    #[test]
    fn datetime_quick_picks_match_exact_labels_only() {
        assert_eq!(DatetimeOption::parse("明日のランチ"), Some(DatetimeOption::TomorrowLunch));
        assert_eq!(DatetimeOption::parse(" 今日のディナー "), Some(DatetimeOption::TodayDinner));
        assert_eq!(DatetimeOption::parse("明日のランチを4名で"), None);
        assert_eq!(DatetimeOption::parse("🔙 確認画面に戻る"), Some(DatetimeOption::BackToConfirm));
        assert_eq!(DatetimeOption::parse("❌ キャンセル"), Some(DatetimeOption::Cancel));
    }

    #[test]
    fn cancel_is_never_matched_inside_other_text() {
        assert_eq!(DatetimeOption::parse("キャンセルで"), Some(DatetimeOption::Cancel));
        assert_eq!(DatetimeOption::parse("cancel"), Some(DatetimeOption::Cancel));
        assert_eq!(DatetimeOption::parse("要望: キャンセル待ちでも可"), None);
        assert_eq!(DatetimeOption::parse("cancel.team@example.com"), None);
        assert_eq!(DatetimeOption::parse("確認画面に戻る前に人数を変えたい"), None);
    }
}
