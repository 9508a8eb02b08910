//! Conditions - the accumulated dimensions of a dining request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::foundation::lenient;

/// Structured search conditions extracted from a conversation.
///
/// Every dimension is optional. Blank strings never survive
/// deserialization, and `party_size` is either a positive integer or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub cuisine_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub time: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::positive_int"
    )]
    pub party_size: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub budget: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub atmosphere: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub special_requirements: Option<String>,
}

impl Conditions {
    /// Field names recognized by the extractor, in canonical order.
    pub const FIELDS: [&'static str; 7] = [
        "cuisine_type",
        "location",
        "time",
        "party_size",
        "budget",
        "atmosphere",
        "special_requirements",
    ];

    /// Builds conditions from a loosely typed field map, ignoring unknown keys.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let text = |key: &str| fields.get(key).and_then(lenient::text_of);
        Self {
            cuisine_type: text("cuisine_type"),
            location: text("location"),
            time: text("time"),
            party_size: fields.get("party_size").and_then(lenient::positive_int_of),
            budget: text("budget"),
            atmosphere: text("atmosphere"),
            special_requirements: text("special_requirements"),
        }
    }

    /// Returns true if no dimension is set.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Overlays `newer` on top of self.
    ///
    /// A dimension present in `newer` wins; a dimension absent from `newer`
    /// keeps the current value.
    pub fn merge(&self, newer: &Conditions) -> Conditions {
        Conditions {
            cuisine_type: newer.cuisine_type.clone().or_else(|| self.cuisine_type.clone()),
            location: newer.location.clone().or_else(|| self.location.clone()),
            time: newer.time.clone().or_else(|| self.time.clone()),
            party_size: newer.party_size.or(self.party_size),
            budget: newer.budget.clone().or_else(|| self.budget.clone()),
            atmosphere: newer.atmosphere.clone().or_else(|| self.atmosphere.clone()),
            special_requirements: newer
                .special_requirements
                .clone()
                .or_else(|| self.special_requirements.clone()),
        }
    }

    /// Stable identity of this condition set, as lowercase hex SHA-256.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (key, value) in self.entries() {
            hasher.update(key.as_bytes());
            hasher.update([0x1f]);
            hasher.update(value.as_bytes());
            hasher.update([0x1e]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Human-readable restatement, e.g. `場所: 渋谷 / 料理: 中華`.
    ///
    /// Empty when no dimension is set.
    pub fn describe(&self) -> String {
        self.entries()
            .into_iter()
            .map(|(key, value)| match key {
                "party_size" => format!("{}: {}名", label(key), value),
                _ => format!("{}: {}", label(key), value),
            })
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// The set dimensions in canonical order.
    fn entries(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                out.push((key, value));
            }
        };
        push("cuisine_type", self.cuisine_type.clone());
        push("location", self.location.clone());
        push("time", self.time.clone());
        push("party_size", self.party_size.map(|n| n.to_string()));
        push("budget", self.budget.clone());
        push("atmosphere", self.atmosphere.clone());
        push("special_requirements", self.special_requirements.clone());
        out
    }
}

fn label(key: &str) -> &'static str {
    match key {
        "cuisine_type" => "料理",
        "location" => "場所",
        "time" => "時間",
        "party_size" => "人数",
        "budget" => "予算",
        "atmosphere" => "雰囲気",
        _ => "要望",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chinese_in_shibuya() -> Conditions {
        Conditions {
            cuisine_type: Some("中華".to_string()),
            location: Some("渋谷".to_string()),
            atmosphere: Some("静か".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn deserializes_leniently() {
        let c: Conditions = serde_json::from_value(json!({
            "cuisine_type": "  中華 ",
            "location": "",
            "party_size": "3名",
            "budget": 5000,
            "atmosphere": null,
            "unknown": "ignored"
        }))
        .unwrap();

        assert_eq!(c.cuisine_type.as_deref(), Some("中華"));
        assert_eq!(c.location, None);
        assert_eq!(c.party_size, Some(3));
        assert_eq!(c.budget.as_deref(), Some("5000"));
        assert_eq!(c.atmosphere, None);
    }

    #[test]
    fn zero_or_negative_party_size_is_absent() {
        let zero: Conditions = serde_json::from_value(json!({"party_size": 0})).unwrap();
        let negative: Conditions = serde_json::from_value(json!({"party_size": -1})).unwrap();
        let words: Conditions = serde_json::from_value(json!({"party_size": "大人数"})).unwrap();
        assert_eq!(zero.party_size, None);
        assert_eq!(negative.party_size, None);
        assert_eq!(words.party_size, None);
    }

    #[test]
    fn serializes_only_present_fields() {
        let json = serde_json::to_value(chinese_in_shibuya()).unwrap();
        assert_eq!(
            json,
            json!({"cuisine_type": "中華", "location": "渋谷", "atmosphere": "静か"})
        );
        assert_eq!(serde_json::to_value(Conditions::default()).unwrap(), json!({}));
    }

    #[test]
    fn merge_overrides_supplied_and_keeps_the_rest() {
        let prior = chinese_in_shibuya();
        let newer = Conditions {
            location: Some("新宿".to_string()),
            party_size: Some(4),
            ..Default::default()
        };

        let merged = prior.merge(&newer);

        assert_eq!(merged.location.as_deref(), Some("新宿"));
        assert_eq!(merged.party_size, Some(4));
        assert_eq!(merged.cuisine_type.as_deref(), Some("中華"));
        assert_eq!(merged.atmosphere.as_deref(), Some("静か"));
    }

    #[test]
    fn from_fields_ignores_unknown_and_coerces() {
        let mut map = Map::new();
        map.insert("location".into(), json!("銀座"));
        map.insert("party_size".into(), json!(2.5));
        map.insert("date".into(), json!("2030-01-01"));

        let c = Conditions::from_fields(&map);
        assert_eq!(c.location.as_deref(), Some("銀座"));
        assert_eq!(c.party_size, None);
        assert_eq!(c, Conditions { location: Some("銀座".into()), ..Default::default() });
    }

    #[test]
    fn fingerprint_is_stable_and_distinguishes_sets() {
        let a = chinese_in_shibuya();
        let b = chinese_in_shibuya();
        let mut c = chinese_in_shibuya();
        c.location = Some("新宿".to_string());

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn fingerprint_does_not_confuse_fields() {
        let as_cuisine = Conditions { cuisine_type: Some("静か".into()), ..Default::default() };
        let as_mood = Conditions { atmosphere: Some("静か".into()), ..Default::default() };
        assert_ne!(as_cuisine.fingerprint(), as_mood.fingerprint());
    }

    #[test]
    fn describe_lists_set_dimensions() {
        let mut c = chinese_in_shibuya();
        c.party_size = Some(3);
        assert_eq!(c.describe(), "料理: 中華 / 場所: 渋谷 / 人数: 3名 / 雰囲気: 静か");
        assert_eq!(Conditions::default().describe(), "");
        assert!(Conditions::default().is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_text() -> impl Strategy<Value = Option<String>> {
        prop::option::of("[a-z渋谷新宿中華和食]{1,6}")
    }

    fn arb_conditions() -> impl Strategy<Value = Conditions> {
        (
            arb_text(),
            arb_text(),
            arb_text(),
            prop::option::of(1u32..50),
            arb_text(),
            arb_text(),
            arb_text(),
        )
            .prop_map(
                |(cuisine_type, location, time, party_size, budget, atmosphere, special_requirements)| {
                    Conditions {
                        cuisine_type,
                        location,
                        time,
                        party_size,
                        budget,
                        atmosphere,
                        special_requirements,
                    }
                },
            )
    }

    proptest! {
        /// A field the newer turn leaves out keeps the prior value across any
        /// number of merges.
        #[test]
        fn absent_fields_survive_repeated_merges(
            prior in arb_conditions(),
            turns in prop::collection::vec(arb_conditions(), 0..6),
        ) {
            let mut acc = prior.clone();
            let mut last_location = prior.location.clone();
            for turn in &turns {
                acc = acc.merge(turn);
                if turn.location.is_some() {
                    last_location = turn.location.clone();
                }
                prop_assert_eq!(&acc.location, &last_location);
            }
        }

        #[test]
        fn merging_empty_is_identity(c in arb_conditions()) {
            prop_assert_eq!(c.merge(&Conditions::default()), c);
        }

        #[test]
        fn fingerprint_is_deterministic(c in arb_conditions()) {
            prop_assert_eq!(c.fingerprint(), c.clone().fingerprint());
        }
    }
}
