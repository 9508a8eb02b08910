//! PlaceSearchAdapter - conditions in, deduplicated pages of candidates out.
//!
//! Provider result sets are cached per condition fingerprint. Page 1
//! always starts a fresh result set; later pages extend the cached one by
//! following continuation tokens until the window plus one lookahead item
//! is available. Once a result set reports `has_more = false` it is closed
//! and never extended again.

use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

use crate::domain::search::{
    price_level_text, Conditions, OpeningHours, PriceLevel, RestaurantCandidate, SearchError,
    SearchPage,
};
use crate::ports::{PlaceDetails, PlaceQuery, PlacesProvider, Venue};

const GENERIC_QUERY: &str = "レストラン";
const DRINKING_REQUEST: &str = "お酒";
const DRINKING_QUERY: &str = "居酒屋";
const BAR_TYPES: [&str; 2] = ["居酒屋", "バー"];

/// Tuning for [`PlaceSearchAdapter`].
#[derive(Debug, Clone)]
pub struct PlaceSearchSettings {
    /// Location used when the conditions name none.
    pub default_location: String,
    pub page_size: usize,
    /// Upper bound on provider pages fetched for one result set.
    pub max_provider_pages: u32,
    pub cache_ttl: Duration,
    /// Upper bound on cached result sets.
    pub max_cached_sets: usize,
}

impl Default for PlaceSearchSettings {
    fn default() -> Self {
        Self {
            default_location: "渋谷".to_string(),
            page_size: 5,
            max_provider_pages: 3,
            cache_ttl: Duration::from_secs(900),
            max_cached_sets: 256,
        }
    }
}

#[derive(Debug)]
struct CachedVenue {
    candidate: RestaurantCandidate,
    enriched: bool,
}

#[derive(Debug)]
struct ResultSet {
    query: PlaceQuery,
    venues: Vec<CachedVenue>,
    seen: HashSet<String>,
    next_token: Option<String>,
    provider_pages: u32,
    closed: bool,
    created_at: Instant,
}

impl ResultSet {
    fn new(query: PlaceQuery) -> Self {
        Self {
            query,
            venues: Vec::new(),
            seen: HashSet::new(),
            next_token: None,
            provider_pages: 0,
            closed: false,
            created_at: Instant::now(),
        }
    }

    /// Appends venues not seen before. Returns how many were new.
    fn absorb(&mut self, venues: Vec<Venue>) -> usize {
        let before = self.venues.len();
        for venue in venues {
            if venue.place_id.is_empty() || !self.seen.insert(venue.place_id.clone()) {
                continue;
            }
            self.venues.push(CachedVenue {
                candidate: normalize(venue),
                enriched: false,
            });
        }
        self.venues.len() - before
    }
}

type SharedSet = Arc<Mutex<ResultSet>>;

pub struct PlaceSearchAdapter {
    provider: Arc<dyn PlacesProvider>,
    settings: PlaceSearchSettings,
    cache: RwLock<HashMap<String, SharedSet>>,
}

impl PlaceSearchAdapter {
    pub fn new(provider: Arc<dyn PlacesProvider>, settings: PlaceSearchSettings) -> Self {
        Self {
            provider,
            settings,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn provider(&self) -> &Arc<dyn PlacesProvider> {
        &self.provider
    }

    /// Provider query for a condition set.
    pub fn build_query(&self, conditions: &Conditions) -> PlaceQuery {
        let mut parts: Vec<&str> = Vec::new();
        let cuisine = conditions.cuisine_type.as_deref();
        parts.push(cuisine.unwrap_or(GENERIC_QUERY));

        let wants_drinks = conditions
            .special_requirements
            .as_deref()
            .is_some_and(|r| r.contains(DRINKING_REQUEST));
        let is_bar = cuisine.is_some_and(|c| BAR_TYPES.contains(&c));
        if wants_drinks && !is_bar {
            parts.push(DRINKING_QUERY);
        }
        if let Some(atmosphere) = conditions.atmosphere.as_deref() {
            parts.push(atmosphere);
        }
        if let Some(budget) = conditions.budget.as_deref() {
            parts.push(budget);
        }

        let location = conditions
            .location
            .clone()
            .unwrap_or_else(|| self.settings.default_location.clone());
        PlaceQuery::new(parts.join(" "), location)
    }

    /// Returns page `page` (1-based) for `conditions`.
    ///
    /// # Errors
    ///
    /// - `PlacesUnavailable` if the provider fails before any venue of the
    ///   window could be served
    /// - `NoResults` if page 1 is empty
    pub async fn search(&self, conditions: &Conditions, page: u32) -> Result<SearchPage, SearchError> {
        let page = page.max(1);
        let fingerprint = conditions.fingerprint();
        let set = if page == 1 {
            self.fresh_set(&fingerprint, conditions).await
        } else {
            self.existing_set(&fingerprint, conditions).await
        };

        let mut set = set.lock().await;
        let page_size = self.settings.page_size.max(1);
        let start = (page as usize - 1) * page_size;
        let end = start + page_size;

        let fetch_error = self.extend(&mut set, end + 1).await.err();
        if set.venues.len() <= start {
            if let Some(detail) = fetch_error {
                return Err(SearchError::places_unavailable(detail));
            }
            if page == 1 {
                return Err(SearchError::NoResults);
            }
            set.closed = true;
            return Ok(SearchPage::empty(page));
        }

        let has_more = !set.closed && set.venues.len() > end;
        if !has_more {
            set.closed = true;
        }

        let window_end = end.min(set.venues.len());
        self.enrich(&mut set.venues[start..window_end]).await;
        let restaurants = set.venues[start..window_end]
            .iter()
            .map(|v| v.candidate.clone())
            .collect();

        tracing::debug!(
            page,
            cached = set.venues.len(),
            provider_pages = set.provider_pages,
            has_more,
            "search page served"
        );
        Ok(SearchPage {
            page,
            restaurants,
            has_more,
        })
    }

    async fn fresh_set(&self, fingerprint: &str, conditions: &Conditions) -> SharedSet {
        let set = Arc::new(Mutex::new(ResultSet::new(self.build_query(conditions))));
        let mut cache = self.cache.write().await;
        self.evict(&mut cache);
        cache.insert(fingerprint.to_string(), set.clone());
        set
    }

    async fn existing_set(&self, fingerprint: &str, conditions: &Conditions) -> SharedSet {
        let cached = self.cache.read().await.get(fingerprint).cloned();
        if let Some(set) = cached {
            if set.lock().await.created_at.elapsed() <= self.settings.cache_ttl {
                return set;
            }
        }
        tracing::debug!("result set missing or expired, rebuilding");
        self.fresh_set(fingerprint, conditions).await
    }

    /// Drops expired sets, then the oldest ones while over capacity.
    fn evict(&self, cache: &mut HashMap<String, SharedSet>) {
        let ttl = self.settings.cache_ttl;
        cache.retain(|_, set| match set.try_lock() {
            Ok(set) => set.created_at.elapsed() <= ttl,
            Err(_) => true,
        });

        while cache.len() >= self.settings.max_cached_sets.max(1) {
            let oldest = cache
                .iter()
                .filter_map(|(key, set)| set.try_lock().ok().map(|s| (key.clone(), s.created_at)))
                .min_by_key(|(_, created_at)| *created_at)
                .map(|(key, _)| key);
            match oldest {
                Some(key) => {
                    cache.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Fetches provider pages until `wanted` venues are cached or the
    /// provider is exhausted.
    async fn extend(&self, set: &mut ResultSet, wanted: usize) -> Result<(), String> {
        while !set.closed && set.venues.len() < wanted {
            let first = set.provider_pages == 0;
            if !first && set.next_token.is_none() {
                break;
            }
            if set.provider_pages >= self.settings.max_provider_pages {
                break;
            }

            let token = set.next_token.clone();
            match self.provider.find(&set.query, token.as_deref()).await {
                Ok(result) => {
                    set.provider_pages += 1;
                    set.next_token = result.next_token;
                    let added = set.absorb(result.venues);
                    tracing::debug!(added, provider_pages = set.provider_pages, "provider page fetched");
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        provider = self.provider.provider_name(),
                        "places search failed"
                    );
                    return Err(e.to_string());
                }
            }
        }
        Ok(())
    }

    /// Fills contact details for the window, concurrently.
    ///
    /// A failed lookup leaves the fields empty.
    async fn enrich(&self, window: &mut [CachedVenue]) {
        let pending: Vec<usize> = (0..window.len()).filter(|&i| !window[i].enriched).collect();
        if pending.is_empty() {
            return;
        }

        let lookups = pending
            .iter()
            .map(|&i| self.provider.details(&window[i].candidate.place_id));
        let results = join_all(lookups).await;

        for (i, result) in pending.into_iter().zip(results) {
            let venue = &mut window[i];
            match result {
                Ok(details) => apply_details(&mut venue.candidate, details),
                Err(e) => tracing::warn!(
                    error = %e,
                    place_id = %venue.candidate.place_id,
                    "place details lookup failed"
                ),
            }
            venue.enriched = true;
        }
    }
}

/// Maps a provider venue onto the domain shape.
fn normalize(venue: Venue) -> RestaurantCandidate {
    let price_level = venue.price_level.and_then(PriceLevel::new);
    let opening_hours = (venue.open_now.is_some() || !venue.weekday_text.is_empty()).then(|| {
        OpeningHours {
            open_now: venue.open_now,
            weekday_text: venue.weekday_text,
        }
    });

    RestaurantCandidate {
        place_id: venue.place_id,
        name: venue.name,
        address: venue.formatted_address.unwrap_or_default(),
        rating: venue.rating.filter(|r| r.is_finite() && *r > 0.0).unwrap_or(0.0),
        user_ratings_total: venue.user_ratings_total.unwrap_or(0),
        price_level,
        price_level_text: price_level_text(price_level),
        types: venue.types,
        vicinity: venue.vicinity.unwrap_or_default(),
        photo_url: venue.photo_url,
        website: None,
        phone_number: None,
        url: None,
        opening_hours,
    }
}

fn apply_details(candidate: &mut RestaurantCandidate, details: PlaceDetails) {
    candidate.website = details.website.or(candidate.website.take());
    candidate.phone_number = details.phone_number.or(candidate.phone_number.take());
    candidate.url = details.url.or(candidate.url.take());
    if details.open_now.is_some() || !details.weekday_text.is_empty() {
        candidate.opening_hours = Some(OpeningHours {
            open_now: details.open_now,
            weekday_text: details.weekday_text,
        });
    }
}
