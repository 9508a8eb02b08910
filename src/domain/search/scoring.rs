//! Scoring Engine - Ranks candidates against the accumulated conditions.
//!
//! # Algorithm
//!
//! ```text
//! base        = 20 + rating × 8        (rating known, 0 < r ≤ 5)
//!             = 20                     (rating unknown, never above a known one)
//! popularity  = min(4, ⌊log10(reviews + 1)⌋)
//! cuisine     = +14 name contains it, +8 synonym in name/types
//! location    = +10 address contains it, +5 partial
//! atmosphere  = +8 keyword in name/types
//! budget      = +10 same tier, +4 adjacent, −6 further
//! score       = clamp(sum, 0, 100)
//! ```
//!
//! All functions are pure; equal inputs give equal outputs.

use super::{price_level_text, Conditions, RestaurantCandidate, ScoredRestaurant};

const NEUTRAL_BASE: f64 = 20.0;
const CUISINE_EXACT: f64 = 14.0;
const CUISINE_SYNONYM: f64 = 8.0;
const LOCATION_EXACT: f64 = 10.0;
const LOCATION_PARTIAL: f64 = 5.0;
const ATMOSPHERE_MATCH: f64 = 8.0;
const BUDGET_EXACT: f64 = 10.0;
const BUDGET_ADJACENT: f64 = 4.0;
const BUDGET_MISS: f64 = -6.0;

const CUISINE_SYNONYMS: &[(&str, &[&str])] = &[
    ("中華", &["中華", "中国", "chinese", "四川", "広東", "餃子", "点心", "飲茶"]),
    ("和食", &["和食", "日本料理", "japanese", "割烹", "懐石", "料亭"]),
    ("イタリアン", &["イタリア", "italian", "pizza", "ピザ", "パスタ", "trattoria", "ristorante"]),
    ("フレンチ", &["フレンチ", "フランス", "french", "bistro", "ビストロ", "brasserie"]),
    ("居酒屋", &["居酒屋", "izakaya", "酒場", "bar", "大衆"]),
    ("カフェ", &["カフェ", "cafe", "café", "coffee", "珈琲", "喫茶"]),
    ("寿司", &["寿司", "鮨", "すし", "sushi"]),
    ("ラーメン", &["ラーメン", "ramen", "拉麺", "らーめん"]),
    ("焼肉", &["焼肉", "焼き肉", "yakiniku", "bbq", "韓国"]),
];

const ATMOSPHERE_KEYWORDS: &[(&str, &[&str])] = &[
    ("静か", &["隠れ家", "個室", "落ち着", "lounge", "cafe", "割烹", "茶"]),
    ("賑やか", &["居酒屋", "izakaya", "bar", "pub", "酒場", "大衆"]),
    ("おしゃれ", &["bistro", "ビストロ", "dining", "ダイニング", "terrace", "テラス", "cafe"]),
    ("カジュアル", &["食堂", "cafe", "diner", "定食", "meal_takeaway"]),
    ("フォーマル", &["料亭", "懐石", "grand", "fine", "鮨"]),
    ("高級", &["料亭", "懐石", "grand", "fine", "鮨"]),
    ("デート", &["bistro", "dining", "wine", "ワイン", "夜景", "ダイニング"]),
];

const LOCATION_SUFFIXES: &[&str] = &["駅周辺", "駅前", "周辺", "付近", "エリア", "駅", "区", "市"];

/// Match strength for a single dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
    Exact,
    Partial,
    Miss,
}

/// Deterministic ranking of candidates.
pub struct ScoringEngine;

impl ScoringEngine {
    /// Scores and orders candidates.
    ///
    /// Order is score desc, then rating desc, then input order.
    pub fn score(candidates: &[RestaurantCandidate], conditions: &Conditions) -> Vec<ScoredRestaurant> {
        let mut scored: Vec<ScoredRestaurant> = candidates
            .iter()
            .map(|c| Self::score_one(c, conditions))
            .collect();

        // sort_by is stable, so provider order survives ties
        scored.sort_by(|a, b| {
            b.score.cmp(&a.score).then_with(|| {
                b.restaurant
                    .rating
                    .partial_cmp(&a.restaurant.rating)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });
        scored
    }

    /// Scores a single candidate.
    pub fn score_one(candidate: &RestaurantCandidate, conditions: &Conditions) -> ScoredRestaurant {
        let mut total = match candidate.known_rating() {
            Some(rating) => 20.0 + rating * 8.0,
            None => NEUTRAL_BASE,
        };
        total += popularity_bonus(candidate.user_ratings_total);

        let mut matched: Vec<String> = Vec::new();

        let location_match = conditions
            .location
            .as_deref()
            .map(|loc| (loc, location_fit(candidate, loc)));
        match location_match {
            Some((loc, Fit::Exact)) => {
                total += LOCATION_EXACT;
                matched.push(format!("{}エリア", loc));
            }
            Some((loc, Fit::Partial)) => {
                total += LOCATION_PARTIAL;
                matched.push(format!("{}周辺", loc));
            }
            _ => {}
        }

        if let Some(cuisine) = conditions.cuisine_type.as_deref() {
            match cuisine_fit(candidate, cuisine) {
                Fit::Exact => {
                    total += CUISINE_EXACT;
                    matched.push(format!("{}が自慢のお店", cuisine));
                }
                Fit::Partial => {
                    total += CUISINE_SYNONYM;
                    matched.push(format!("{}が楽しめるお店", cuisine));
                }
                Fit::Miss => {}
            }
        }

        if let Some(atmosphere) = conditions.atmosphere.as_deref() {
            if atmosphere_matches(candidate, atmosphere) {
                total += ATMOSPHERE_MATCH;
                matched.push(match conditions.party_size {
                    Some(n) => format!("{}名で過ごせる{}な雰囲気", n, atmosphere),
                    None => format!("{}な雰囲気", atmosphere),
                });
            }
        }

        let budget_tier = conditions.budget.as_deref().and_then(budget_tier);
        let price = candidate.price_level.map(|p| p.value()).filter(|p| *p > 0);
        if let (Some(wanted), Some(actual)) = (budget_tier, price) {
            match wanted.abs_diff(actual) {
                0 => {
                    total += BUDGET_EXACT;
                    matched.push(format!(
                        "ご予算に合う価格帯（{}）",
                        price_level_text(candidate.price_level)
                    ));
                }
                1 => {
                    total += BUDGET_ADJACENT;
                    matched.push("ご予算に近い価格帯".to_string());
                }
                _ => total += BUDGET_MISS,
            }
        }

        let score = total.round().clamp(0.0, 100.0) as u8;
        let reason = compose_reason(candidate, &matched);

        ScoredRestaurant {
            restaurant: candidate.clone(),
            score,
            reason,
        }
    }
}

fn compose_reason(candidate: &RestaurantCandidate, matched: &[String]) -> String {
    let rating = candidate.known_rating();
    if matched.is_empty() {
        return match rating {
            Some(r) => format!(
                "評価{:.1}（{}件のレビュー）のお店です。",
                r, candidate.user_ratings_total
            ),
            None => "まだ評価の少ないお店です。".to_string(),
        };
    }

    let mut sentence = matched.join("、");
    if let Some(r) = rating.filter(|r| *r >= 4.0) {
        sentence.push_str(&format!("。評価{:.1}の人気店です", r));
    }
    sentence.push('。');
    sentence
}

fn popularity_bonus(reviews: u32) -> f64 {
    (f64::from(reviews) + 1.0).log10().floor().clamp(0.0, 4.0)
}

fn haystack(candidate: &RestaurantCandidate) -> String {
    let mut text = candidate.name.to_lowercase();
    for t in &candidate.types {
        text.push(' ');
        text.push_str(&t.to_lowercase());
    }
    text
}

fn cuisine_fit(candidate: &RestaurantCandidate, cuisine: &str) -> Fit {
    let wanted = cuisine.to_lowercase();
    if candidate.name.to_lowercase().contains(&wanted) {
        return Fit::Exact;
    }

    let synonyms = CUISINE_SYNONYMS
        .iter()
        .find(|(key, words)| wanted.contains(key) || words.iter().any(|w| wanted.contains(w)))
        .map(|(_, words)| *words)
        .unwrap_or(&[]);

    let text = haystack(candidate);
    if synonyms.iter().any(|w| text.contains(&w.to_lowercase())) {
        Fit::Partial
    } else {
        Fit::Miss
    }
}

fn location_fit(candidate: &RestaurantCandidate, location: &str) -> Fit {
    let address = format!("{} {}", candidate.address, candidate.vicinity);
    if address.contains(location) {
        return Fit::Exact;
    }

    let core = LOCATION_SUFFIXES
        .iter()
        .find_map(|suffix| location.strip_suffix(suffix))
        .filter(|core| !core.is_empty())
        .unwrap_or(location);
    if core != location && address.contains(core) {
        return Fit::Partial;
    }

    let prefix: String = location.chars().take(2).collect();
    if location.chars().count() >= 3 && address.contains(&prefix) {
        Fit::Partial
    } else {
        Fit::Miss
    }
}

fn atmosphere_matches(candidate: &RestaurantCandidate, atmosphere: &str) -> bool {
    let text = haystack(candidate);
    if text.contains(&atmosphere.to_lowercase()) {
        return true;
    }
    ATMOSPHERE_KEYWORDS
        .iter()
        .filter(|(key, _)| atmosphere.contains(key))
        .flat_map(|(_, words)| words.iter())
        .any(|w| text.contains(&w.to_lowercase()))
}

/// Price tier (1–4) implied by a free-text budget.
///
/// Reads words like `安い`/`高級` and amounts like `5000円` or `1万円`.
pub fn budget_tier(budget: &str) -> Option<u8> {
    if let Some(amount) = budget_amount(budget) {
        return Some(match amount {
            0..=1500 => 1,
            1501..=4000 => 2,
            4001..=10000 => 3,
            _ => 4,
        });
    }

    if ["高級", "贅沢", "フォーマル"].iter().any(|w| budget.contains(w)) {
        Some(4)
    } else if ["高め", "ちょっと高", "少し高"].iter().any(|w| budget.contains(w)) {
        Some(3)
    } else if ["普通", "手頃", "そこそこ"].iter().any(|w| budget.contains(w))
        && !budget.contains("お手頃")
    {
        Some(2)
    } else if ["安", "リーズナブル", "お手頃", "格安", "cheap"].iter().any(|w| budget.contains(w)) {
        Some(1)
    } else {
        None
    }
}

fn budget_amount(budget: &str) -> Option<u64> {
    let normalized: String = budget
        .chars()
        .filter(|c| *c != ',' && *c != '，')
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            other => other,
        })
        .collect();

    let start = normalized.find(|c: char| c.is_ascii_digit())?;
    let rest = &normalized[start..];
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let value: u64 = rest[..end].parse().ok()?;
    if rest[end..].starts_with('万') {
        Some(value.saturating_mul(10_000))
    } else if rest[end..].starts_with('千') {
        Some(value.saturating_mul(1_000))
    } else {
        Some(value)
    }
}
