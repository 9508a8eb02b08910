//! Deterministic PlacesProvider used when no Places API key is configured.
//!
//! Twelve synthetic venues named after the query's cuisine and location,
//! served five per page with `mock-page-N` continuation tokens.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::ports::{PlaceDetails, PlaceQuery, PlacesError, PlacesPage, PlacesProvider, Venue};

const VENUE_COUNT: usize = 12;
const PAGE_SIZE: usize = 5;
const DEFAULT_CUISINE: &str = "和食";
const GENERIC_QUERY: &str = "レストラン";
const TOKEN_PREFIX: &str = "mock-page-";
const PLACE_ID_PREFIX: &str = "mock_place_id_";

#[derive(Debug, Clone, Default)]
pub struct MockPlacesProvider {
    find_calls: Arc<AtomicUsize>,
    details_calls: Arc<AtomicUsize>,
}

impl MockPlacesProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `find` calls served.
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    fn cuisine_of(query: &PlaceQuery) -> &str {
        match query.text.split_whitespace().next() {
            Some(word) if word != GENERIC_QUERY => word,
            _ => DEFAULT_CUISINE,
        }
    }

    fn venue(i: usize, cuisine: &str, location: &str) -> Venue {
        let letter = char::from(b'A' + i as u8);
        let n = i + 1;
        Venue {
            place_id: format!("{}{}", PLACE_ID_PREFIX, n),
            name: format!("{}レストラン {} ({})", cuisine, letter, location),
            formatted_address: Some(format!("東京都{}区 {}-{}-{}", location, n, n, n)),
            vicinity: Some(format!("{}駅周辺", location)),
            rating: Some(((3.5 + (i % 3) as f64 * 0.3) * 10.0).round() / 10.0),
            user_ratings_total: Some(50 + i as u32 * 20),
            price_level: Some((i % 4) as u8 + 1),
            types: vec!["restaurant".to_string(), "food".to_string()],
            photo_url: None,
            open_now: Some(i % 3 != 0),
            weekday_text: Vec::new(),
        }
    }

    fn index_of(place_id: &str) -> Option<usize> {
        let n: usize = place_id.strip_prefix(PLACE_ID_PREFIX)?.parse().ok()?;
        (1..=VENUE_COUNT).contains(&n).then(|| n - 1)
    }
}

#[async_trait]
impl PlacesProvider for MockPlacesProvider {
    async fn find(
        &self,
        query: &PlaceQuery,
        continuation: Option<&str>,
    ) -> Result<PlacesPage, PlacesError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);

        let page_index = match continuation {
            None => 0,
            Some(token) => token
                .strip_prefix(TOKEN_PREFIX)
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| PlacesError::status("INVALID_REQUEST", "unknown page token"))?,
        };

        let cuisine = Self::cuisine_of(query);
        let start = page_index * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(VENUE_COUNT);
        let venues = (start..end)
            .map(|i| Self::venue(i, cuisine, &query.location))
            .collect();
        let next_token = (end < VENUE_COUNT).then(|| format!("{}{}", TOKEN_PREFIX, page_index + 1));

        Ok(PlacesPage { venues, next_token })
    }

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);

        let i = Self::index_of(place_id)
            .ok_or_else(|| PlacesError::status("NOT_FOUND", place_id.to_string()))?;
        let letter = char::from(b'a' + i as u8);
        Ok(PlaceDetails {
            website: (i % 2 == 0).then(|| format!("https://example-restaurant-{}.com", letter)),
            phone_number: Some(format!("03-{}-{}", 1000 + i, 5000 + i)),
            url: Some(format!("https://maps.google.com/?cid={}", 12345 + i)),
            open_now: Some(i % 3 != 0),
            weekday_text: Vec::new(),
        })
    }

    fn provider_name(&self) -> &str {
        "mock_places"
    }

    fn is_mock(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn query() -> PlaceQuery {
        PlaceQuery::new("中華 静か", "渋谷")
    }

    #[tokio::test]
    async fn serves_twelve_venues_in_pages_of_five() {
        let provider = MockPlacesProvider::new();

        let first = provider.find(&query(), None).await.unwrap();
        let second = provider
            .find(&query(), first.next_token.as_deref())
            .await
            .unwrap();
        let third = provider
            .find(&query(), second.next_token.as_deref())
            .await
            .unwrap();

        assert_eq!(first.venues.len(), 5);
        assert_eq!(second.venues.len(), 5);
        assert_eq!(third.venues.len(), 2);
        assert!(third.next_token.is_none());

        let ids: HashSet<_> = first
            .venues
            .iter()
            .chain(&second.venues)
            .chain(&third.venues)
            .map(|v| v.place_id.clone())
            .collect();
        assert_eq!(ids.len(), 12);
        assert_eq!(provider.find_calls(), 3);
    }

    #[tokio::test]
    async fn venues_follow_naming_scheme() {
        let page = MockPlacesProvider::new().find(&query(), None).await.unwrap();
        let first = &page.venues[0];

        assert_eq!(first.name, "中華レストラン A (渋谷)");
        assert_eq!(first.place_id, "mock_place_id_1");
        assert_eq!(first.rating, Some(3.5));
        assert_eq!(page.venues[1].rating, Some(3.8));
        assert_eq!(page.venues[2].rating, Some(4.1));
        assert_eq!(first.price_level, Some(1));
        assert_eq!(first.vicinity.as_deref(), Some("渋谷駅周辺"));
    }

    #[tokio::test]
    async fn generic_query_uses_default_cuisine() {
        let page = MockPlacesProvider::new()
            .find(&PlaceQuery::new("レストラン", "新宿"), None)
            .await
            .unwrap();
        assert_eq!(page.venues[0].name, "和食レストラン A (新宿)");
    }

    #[tokio::test]
    async fn details_are_deterministic() {
        let provider = MockPlacesProvider::new();

        let a = provider.details("mock_place_id_1").await.unwrap();
        let b = provider.details("mock_place_id_2").await.unwrap();

        assert_eq!(a.website.as_deref(), Some("https://example-restaurant-a.com"));
        assert!(b.website.is_none());
        assert_eq!(a.phone_number.as_deref(), Some("03-1000-5000"));
        assert_eq!(b.url.as_deref(), Some("https://maps.google.com/?cid=12346"));
    }

    #[tokio::test]
    async fn unknown_token_and_id_are_errors() {
        let provider = MockPlacesProvider::new();
        assert!(provider.find(&query(), Some("bogus")).await.is_err());
        assert!(provider.details("mock_place_id_99").await.is_err());
    }

    #[test]
    fn reports_itself_as_mock() {
        assert!(MockPlacesProvider::new().is_mock());
    }
}
