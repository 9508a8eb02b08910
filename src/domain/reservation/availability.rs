//! Pre-flight check of whether a venue can be booked through the assistant.

use serde::{Deserialize, Serialize};

use crate::domain::search::RestaurantCandidate;

/// Chains known to run their own online booking.
const CHAIN_RESTAURANTS: &[&str] = &[
    "すかいらーく",
    "ガスト",
    "ジョナサン",
    "バーミヤン",
    "ココス",
    "くら寿司",
    "スシロー",
    "はま寿司",
    "かっぱ寿司",
    "マクドナルド",
    "ケンタッキー",
    "モスバーガー",
    "デニーズ",
    "ロイヤルホスト",
    "ビッグボーイ",
    "鳥貴族",
    "和民",
    "魚民",
    "白木屋",
    "笑笑",
];

/// Website fragments that indicate an online booking page.
const BOOKING_URL_KEYWORDS: &[&str] = &["reservation", "予約", "booking", "table"];

/// Name fragments of venues that only take reservations by phone.
const PHONE_ONLY_KEYWORDS: &[&str] = &["割烹", "懐石", "料亭", "会席"];

/// How a bookable venue would be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingMethod {
    WebForm,
    PhoneOnly,
    Unknown,
}

/// Verdict of the availability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingAvailability {
    pub available: bool,
    pub method: BookingMethod,
    pub description: String,
    /// Heuristic confidence that online booking will work (0.0 to 1.0).
    pub confidence: f32,
    pub phone_number: Option<String>,
    pub alternative_methods: Vec<String>,
}

impl BookingAvailability {
    /// Classifies a venue from its name, website and phone number.
    pub fn assess(restaurant: &RestaurantCandidate) -> Self {
        let name = restaurant.name.to_lowercase();
        let website = restaurant.website.as_deref();
        let phone = restaurant.phone_number.as_deref();

        let is_chain = CHAIN_RESTAURANTS.iter().any(|c| name.contains(c));
        if is_chain && (website.is_some() || phone.is_some()) {
            return Self::bookable("オンライン予約システム（チェーン店）", 0.8, phone);
        }

        let website_books = website
            .map(|w| w.to_lowercase())
            .map(|w| BOOKING_URL_KEYWORDS.iter().any(|k| w.contains(k)))
            .unwrap_or(false);
        if website_books {
            return Self::bookable("ウェブサイト予約フォーム", 0.9, phone);
        }

        match phone {
            Some(phone) if PHONE_ONLY_KEYWORDS.iter().any(|k| name.contains(k)) => Self {
                available: false,
                method: BookingMethod::PhoneOnly,
                description: "このレストランは電話予約のみ対応しています（高級店のため）".to_string(),
                confidence: 0.0,
                phone_number: Some(phone.to_string()),
                alternative_methods: vec![
                    format!("📞 直接お電話: {}", phone),
                    "🌐 予約サイト（ぐるなび、食べログ、ホットペッパーなど）".to_string(),
                    "🚶 店舗への直接来店".to_string(),
                ],
            },
            Some(phone) => Self::bookable("ウェブサイトまたは電話予約", 0.7, Some(phone)),
            None => Self {
                available: false,
                method: BookingMethod::Unknown,
                description: "予約システムの情報が不足しています".to_string(),
                confidence: 0.0,
                phone_number: None,
                alternative_methods: vec![
                    "🌐 レストランの公式サイトを確認".to_string(),
                    "🚶 店舗への直接来店".to_string(),
                ],
            },
        }
    }

    fn bookable(description: &str, confidence: f32, phone: Option<&str>) -> Self {
        Self {
            available: true,
            method: BookingMethod::WebForm,
            description: description.to_string(),
            confidence,
            phone_number: phone.map(str::to_string),
            alternative_methods: Vec::new(),
        }
    }
}
