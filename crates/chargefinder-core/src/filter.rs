//! Admit/reject entities against a [`FilterSpec`].
//!
//! Every clause is AND-combined and admits everything when its criterion is
//! empty, so `FilterSpec::default()` is the identity filter. Output keeps the
//! input order; ranking happens afterwards.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{ChargeableLocation, ChargerStatus};

/// How the requested amenity set is compared with a site's amenities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmenityMatch {
    /// At least one requested amenity is present.
    #[default]
    Any,
    /// Every requested amenity is present.
    All,
}

/// Answers whether a charger id is in the user's favorites.
pub trait FavoriteLookup {
    fn is_favorite(&self, id: &str) -> bool;
}

impl<F> FavoriteLookup for F
where
    F: Fn(&str) -> bool,
{
    fn is_favorite(&self, id: &str) -> bool {
        self(id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub statuses: BTreeSet<ChargerStatus>,
    pub amenities: BTreeSet<String>,
    pub match_mode: AmenityMatch,
    /// Exact, case-sensitive country name. `None` or empty admits all.
    pub country: Option<String>,
    pub min_capacity: u32,
    pub favorites_only: bool,
}

impl FilterSpec {
    /// True when every clause admits everything.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.active_filter_count() == 0
    }

    /// Number of engaged criteria, counting each selected status and amenity.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        self.statuses.len()
            + self.amenities.len()
            + usize::from(self.country_criterion().is_some())
            + usize::from(self.min_capacity > 0)
            + usize::from(self.favorites_only)
    }

    /// Add `status` if absent, remove it if present.
    pub fn toggle_status(&mut self, status: ChargerStatus) {
        if !self.statuses.remove(&status) {
            self.statuses.insert(status);
        }
    }

    /// Add `amenity` if absent, remove it if present.
    pub fn toggle_amenity(&mut self, amenity: &str) {
        if !self.amenities.remove(amenity) {
            self.amenities.insert(amenity.to_string());
        }
    }

    /// Admit both usable statuses (`active` and `operational`) as one choice.
    #[must_use]
    pub fn with_usable_statuses(mut self) -> Self {
        self.statuses.extend(
            ChargerStatus::ALL
                .into_iter()
                .filter(|status| status.is_usable()),
        );
        self
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn country_criterion(&self) -> Option<&str> {
        self.country.as_deref().filter(|c| !c.is_empty())
    }

    fn admits(&self, entity: &ChargeableLocation, favorites: Option<&dyn FavoriteLookup>) -> bool {
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&entity.status);

        let country_ok = self
            .country_criterion()
            .is_none_or(|country| entity.country == country);

        let amenities_ok = self.amenities.is_empty()
            || match self.match_mode {
                AmenityMatch::All => self.amenities.is_subset(&entity.amenities),
                AmenityMatch::Any => !self.amenities.is_disjoint(&entity.amenities),
            };

        let capacity_ok = entity.capacity >= self.min_capacity;

        // No predicate while favorites_only is set rejects everything.
        let favorite_ok =
            !self.favorites_only || favorites.is_some_and(|lookup| lookup.is_favorite(&entity.id));

        status_ok && country_ok && amenities_ok && capacity_ok && favorite_ok
    }
}

/// Case-insensitive substring match on name, city or address.
///
/// A blank query matches everything. Otherwise the query is used as typed,
/// surrounding whitespace included.
#[must_use]
pub fn matches_search(entity: &ChargeableLocation, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [&entity.name, &entity.city, &entity.address]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Entities whose name, city or address contains `query`, in input order.
#[must_use]
pub fn search(entities: &[Arc<ChargeableLocation>], query: &str) -> Vec<Arc<ChargeableLocation>> {
    entities
        .iter()
        .filter(|entity| matches_search(entity, query))
        .cloned()
        .collect()
}

/// Entities admitted by `spec`, in input order.
///
/// `favorites` is consulted only when `spec.favorites_only` is set; passing
/// `None` in that case yields an empty result.
#[must_use]
pub fn apply(
    entities: &[Arc<ChargeableLocation>],
    spec: &FilterSpec,
    favorites: Option<&dyn FavoriteLookup>,
) -> Vec<Arc<ChargeableLocation>> {
    if spec.favorites_only && favorites.is_none() {
        tracing::debug!("favorites_only set without a favorites lookup; admitting nothing");
    }
    entities
        .iter()
        .filter(|entity| spec.admits(entity, favorites))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
