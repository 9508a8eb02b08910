//! Google Places adapter (Text Search and Place Details JSON APIs).
//!
//! A fresh `next_page_token` is not usable for a short while after it is
//! issued; Google answers `INVALID_REQUEST` until then, so continuation
//! calls wait and retry a bounded number of times.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{PlaceDetails, PlaceQuery, PlacesError, PlacesPage, PlacesProvider, Venue};

const DETAILS_FIELDS: &str = "website,formatted_phone_number,opening_hours,url";
const PHOTO_MAX_WIDTH: u32 = 400;

/// Configuration for [`GooglePlacesProvider`].
#[derive(Debug, Clone)]
pub struct GooglePlacesConfig {
    api_key: Secret<String>,
    /// Base URL (default: https://maps.googleapis.com/maps/api/place).
    pub base_url: String,
    pub language: String,
    pub region: String,
    pub timeout: Duration,
    /// Wait between attempts on a not-yet-valid page token.
    pub token_retry_delay: Duration,
    pub token_retries: u32,
}

impl GooglePlacesConfig {
    pub fn new(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            language: "ja".to_string(),
            region: "jp".to_string(),
            timeout: Duration::from_secs(10),
            token_retry_delay: Duration::from_secs(2),
            token_retries: 3,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token_retry_delay(mut self, delay: Duration) -> Self {
        self.token_retry_delay = delay;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

pub struct GooglePlacesProvider {
    config: GooglePlacesConfig,
    client: Client,
}

impl GooglePlacesProvider {
    pub fn new(config: GooglePlacesConfig) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlacesError::network(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Photo endpoint URL for a photo reference.
    ///
    /// Carries the API key, since browsers load it directly.
    fn photo_url(&self, reference: &str) -> String {
        format!(
            "{}/photo?maxwidth={}&photoreference={}&key={}",
            self.config.base_url,
            PHOTO_MAX_WIDTH,
            reference,
            self.config.api_key()
        )
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, PlacesError> {
        let url = format!("{}/{}", self.config.base_url, endpoint);
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("key", self.config.api_key())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlacesError::Timeout
                } else {
                    PlacesError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::status(status.as_str(), "HTTP error"));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                PlacesError::Timeout
            } else {
                PlacesError::parse(e.to_string())
            }
        })
    }

    fn into_page(&self, body: TextSearchResponse) -> Result<PlacesPage, PlacesError> {
        match body.status.as_str() {
            "OK" => Ok(PlacesPage {
                venues: body.results.into_iter().map(|r| self.into_venue(r)).collect(),
                next_token: body.next_page_token.filter(|t| !t.is_empty()),
            }),
            "ZERO_RESULTS" => Ok(PlacesPage::default()),
            status => Err(PlacesError::status(
                status,
                body.error_message.unwrap_or_default(),
            )),
        }
    }

    fn into_venue(&self, place: PlaceResult) -> Venue {
        let photo_url = place
            .photos
            .into_iter()
            .find_map(|p| p.photo_reference)
            .map(|reference| self.photo_url(&reference));
        let (open_now, weekday_text) = match place.opening_hours {
            Some(hours) => (hours.open_now, hours.weekday_text),
            None => (None, Vec::new()),
        };

        Venue {
            place_id: place.place_id,
            name: place.name,
            formatted_address: place.formatted_address,
            vicinity: place.vicinity,
            rating: place.rating,
            user_ratings_total: place.user_ratings_total,
            price_level: place.price_level,
            types: place.types,
            photo_url,
            open_now,
            weekday_text,
        }
    }

    fn into_details(body: DetailsResponse) -> Result<PlaceDetails, PlacesError> {
        if body.status != "OK" {
            return Err(PlacesError::status(
                body.status,
                body.error_message.unwrap_or_default(),
            ));
        }
        let result = body.result.unwrap_or_default();
        let (open_now, weekday_text) = match result.opening_hours {
            Some(hours) => (hours.open_now, hours.weekday_text),
            None => (None, Vec::new()),
        };
        Ok(PlaceDetails {
            website: result.website.filter(|s| !s.is_empty()),
            phone_number: result.formatted_phone_number.filter(|s| !s.is_empty()),
            url: result.url.filter(|s| !s.is_empty()),
            open_now,
            weekday_text,
        })
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesProvider {
    async fn find(
        &self,
        query: &PlaceQuery,
        continuation: Option<&str>,
    ) -> Result<PlacesPage, PlacesError> {
        let Some(token) = continuation else {
            let text = query.full_text();
            let body: TextSearchResponse = self
                .get(
                    "textsearch/json",
                    &[
                        ("query", text.as_str()),
                        ("language", self.config.language.as_str()),
                        ("region", self.config.region.as_str()),
                        ("type", "restaurant"),
                    ],
                )
                .await?;
            return self.into_page(body);
        };

        let mut attempt = 0;
        loop {
            let body: TextSearchResponse = self
                .get("textsearch/json", &[("pagetoken", token)])
                .await?;
            if body.status == "INVALID_REQUEST" && attempt < self.config.token_retries {
                attempt += 1;
                tracing::debug!(attempt, "page token not ready yet");
                sleep(self.config.token_retry_delay).await;
                continue;
            }
            return self.into_page(body);
        }
    }

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let body: DetailsResponse = self
            .get(
                "details/json",
                &[
                    ("place_id", place_id),
                    ("fields", DETAILS_FIELDS),
                    ("language", self.config.language.as_str()),
                ],
            )
            .await?;
        Self::into_details(body)
    }

    fn provider_name(&self) -> &str {
        "google_places"
    }
}

// ----- Google Places API Types -----

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    next_page_token: Option<String>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    place_id: String,
    #[serde(default)]
    name: String,
    formatted_address: Option<String>,
    vicinity: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    price_level: Option<u8>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    photos: Vec<PhotoRef>,
    opening_hours: Option<HoursResult>,
}

#[derive(Debug, Deserialize)]
struct PhotoRef {
    photo_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HoursResult {
    open_now: Option<bool>,
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
    error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DetailsResult {
    website: Option<String>,
    formatted_phone_number: Option<String>,
    url: Option<String>,
    opening_hours: Option<HoursResult>,
}
