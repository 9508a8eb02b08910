//! A window over a provider result set.

use super::RestaurantCandidate;

/// One page of candidates for a condition fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub page: u32,
    pub restaurants: Vec<RestaurantCandidate>,
    /// True iff candidates exist beyond this window.
    pub has_more: bool,
}

impl SearchPage {
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            restaurants: Vec::new(),
            has_more: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}
