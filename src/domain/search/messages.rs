//! User-facing search messages.

use super::Conditions;

/// Message when nothing could be extracted and no prior conditions exist.
pub const NOT_UNDERSTOOD: &str = "検索条件を理解できませんでした。もう一度お試しください。";

/// Summary for a non-empty result page, followed by the conditions restatement.
pub fn found(count: usize, conditions: &Conditions) -> String {
    let location = conditions.location.as_deref();
    let cuisine = conditions.cuisine_type.as_deref();
    let base = match (location, cuisine) {
        (Some(l), Some(c)) => format!("{}の{}", l, c),
        (Some(l), None) => format!("{}のお店", l),
        (None, Some(c)) => format!("{}のお店", c),
        (None, None) => "お店".to_string(),
    };

    let headline = if count == 1 {
        format!("{}を1件見つかりました！", base)
    } else {
        format!("{}の候補が{}件見つかりました！", base, count)
    };
    with_restatement(headline, conditions)
}

/// Empty-state message for a valid query with no candidates.
pub fn not_found(conditions: &Conditions) -> String {
    let location = conditions
        .location
        .as_deref()
        .map(|l| format!("{}の", l))
        .unwrap_or_default();
    let cuisine = conditions.cuisine_type.as_deref().unwrap_or("指定された条件");
    let headline = format!(
        "{}{}のお店は見つかりませんでした。条件を変更してお試しください。",
        location, cuisine
    );
    with_restatement(headline, conditions)
}

fn with_restatement(headline: String, conditions: &Conditions) -> String {
    let described = conditions.describe();
    if described.is_empty() {
        headline
    } else {
        format!("{}\n（検索条件: {}）", headline, described)
    }
}
