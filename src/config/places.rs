//! Places provider and search pagination configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Places configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PlacesConfig {
    /// Google Places API key; absent means mock venues
    pub google_api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Area searched when the user names none
    #[serde(default = "default_location")]
    pub default_location: String,

    /// Restaurants per search page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound on provider pages fetched for one result set
    #[serde(default = "default_max_provider_pages")]
    pub max_provider_pages: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Lifetime of a cached result set
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl PlacesConfig {
    pub fn has_google(&self) -> bool {
        self.google_api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn google_key(&self) -> Option<Secret<String>> {
        self.google_api_key
            .as_ref()
            .filter(|_| self.has_google())
            .map(|k| Secret::new(k.trim().to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Validate places configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ValidationError::InvalidPlacesUrl(self.base_url.clone()));
        }
        if self.page_size == 0 || self.page_size > 20 {
            return Err(ValidationError::InvalidPageSize);
        }
        if self.max_provider_pages == 0 || self.max_provider_pages > 3 {
            return Err(ValidationError::InvalidProviderPages);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidProviderTimeout("places"));
        }
        if self.default_location.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PLACES__DEFAULT_LOCATION"));
        }
        Ok(())
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            base_url: default_base_url(),
            language: default_language(),
            region: default_region(),
            default_location: default_location(),
            page_size: default_page_size(),
            max_provider_pages: default_max_provider_pages(),
            timeout_secs: default_timeout(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_language() -> String {
    "ja".to_string()
}

fn default_region() -> String {
    "jp".to_string()
}

fn default_location() -> String {
    "渋谷".to_string()
}

fn default_page_size() -> usize {
    5
}

fn default_max_provider_pages() -> u32 {
    3
}

fn default_timeout() -> u64 {
    10
}

fn default_cache_ttl() -> u64 {
    900
}
