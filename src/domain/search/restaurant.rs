//! Restaurant candidates as surfaced to the chat client.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::lenient;

/// Provider price tier, 0 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceLevel(u8);

impl PriceLevel {
    /// Highest tier a provider reports.
    pub const MAX: u8 = 4;

    /// Creates a price level, returning None outside 0..=4.
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Japanese label for the tier.
    pub fn label(&self) -> &'static str {
        match self.0 {
            0 => "価格帯未設定",
            1 => "リーズナブル（¥）",
            2 => "普通（¥¥）",
            3 => "やや高め（¥¥¥）",
            _ => "高級（¥¥¥¥）",
        }
    }
}

/// Label used when the provider does not report a tier.
pub const NO_PRICE_INFO: &str = "価格情報なし";

/// Label for an optional tier.
pub fn price_level_text(level: Option<PriceLevel>) -> String {
    level
        .map(|l| l.label())
        .unwrap_or(NO_PRICE_INFO)
        .to_string()
}

/// Opening hours as reported by the provider's details call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningHours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    pub weekday_text: Vec<String>,
}

/// Normalized venue record.
///
/// Clients echo these back when starting a reservation, often partially
/// filled, so every field defaults and blank strings read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantCandidate {
    pub place_id: String,
    pub name: String,
    pub address: String,
    #[serde(deserialize_with = "lenient::number_or_zero")]
    pub rating: f64,
    #[serde(deserialize_with = "lenient::count_or_zero")]
    pub user_ratings_total: u32,
    #[serde(deserialize_with = "price_level_lenient")]
    pub price_level: Option<PriceLevel>,
    pub price_level_text: String,
    pub types: Vec<String>,
    pub vicinity: String,
    #[serde(deserialize_with = "lenient::text")]
    pub photo_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub website: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub phone_number: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub url: Option<String>,
    #[serde(deserialize_with = "opening_hours_lenient")]
    pub opening_hours: Option<OpeningHours>,
}

impl RestaurantCandidate {
    /// Rating if the provider reported one.
    pub fn known_rating(&self) -> Option<f64> {
        (self.rating > 0.0 && self.rating <= 5.0).then_some(self.rating)
    }

    /// Address for display, falling back to the vicinity.
    pub fn display_address(&self) -> &str {
        if self.address.trim().is_empty() {
            &self.vicinity
        } else {
            &self.address
        }
    }
}

fn price_level_lenient<'de, D>(deserializer: D) -> Result<Option<PriceLevel>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .and_then(|v| u8::try_from(v).ok())
        .and_then(PriceLevel::new))
}

fn opening_hours_lenient<'de, D>(deserializer: D) -> Result<Option<OpeningHours>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value::<OpeningHours>(v).ok())
        .filter(|h| h.open_now.is_some() || !h.weekday_text.is_empty()))
}

/// A candidate ranked against the current conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRestaurant {
    #[serde(flatten)]
    pub restaurant: RestaurantCandidate,
    pub score: u8,
    pub reason: String,
}
