//! User favorites, stored as a narrow projection of the charger record.
//!
//! Only the fields needed to list a favorite offline are persisted, so the
//! catalog schema can change without invalidating stored favorites.
//!
//! Serialization contract (version 1):
//!
//! ```json
//! {"version":1,"favorites":[{"id":"..","name":"..","address":"..","city":"..","country":".."}]}
//! ```
//!
//! A bare JSON array of favorites (the unversioned legacy layout) is also
//! accepted on read; writes always use the versioned envelope.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{ChargeableLocation, EntityCatalog};
use crate::filter::FavoriteLookup;

pub const FAVORITES_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteCharger {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
}

impl From<&ChargeableLocation> for FavoriteCharger {
    fn from(charger: &ChargeableLocation) -> Self {
        Self {
            id: charger.id.clone(),
            name: charger.name.clone(),
            address: charger.address.clone(),
            city: charger.city.clone(),
            country: charger.country.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FavoritesFile {
    version: u32,
    favorites: Vec<FavoriteCharger>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredFavorites {
    Versioned(FavoritesFile),
    Legacy(Vec<FavoriteCharger>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesStore {
    favorites: Vec<FavoriteCharger>,
}

impl FavoritesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored blob.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the blob is neither layout, or if it
    /// declares an unsupported version.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let favorites = match serde_json::from_str::<StoredFavorites>(json)? {
            StoredFavorites::Versioned(file) if file.version == FAVORITES_FORMAT_VERSION => {
                file.favorites
            }
            StoredFavorites::Versioned(file) => {
                return Err(serde::de::Error::custom(format!(
                    "unsupported favorites version {}",
                    file.version
                )));
            }
            StoredFavorites::Legacy(favorites) => favorites,
        };

        let mut store = Self::new();
        for favorite in favorites {
            store.insert(favorite);
        }
        Ok(store)
    }

    /// Restore from an optional stored blob, starting empty when the blob is
    /// missing or unreadable.
    #[must_use]
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::new();
        };
        match Self::parse(json) {
            Ok(store) => {
                tracing::debug!(count = store.len(), "restored favorites");
                store
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable favorites");
                Self::new()
            }
        }
    }

    /// Serialize using the current versioned layout.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&FavoritesFile {
            version: FAVORITES_FORMAT_VERSION,
            favorites: self.favorites.clone(),
        })
    }

    /// Add a charger. Returns `false` if it was already a favorite.
    pub fn add(&mut self, charger: &ChargeableLocation) -> bool {
        self.insert(FavoriteCharger::from(charger))
    }

    /// Returns `false` if `id` was not a favorite.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|f| f.id != id);
        self.favorites.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f.id == id)
    }

    pub fn clear(&mut self) {
        self.favorites.clear();
    }

    /// Favorites in the order they were added.
    #[must_use]
    pub fn list(&self) -> &[FavoriteCharger] {
        &self.favorites
    }

    /// Full catalog records for the stored favorites, in favorite order.
    /// Favorites whose id is no longer in the catalog are skipped.
    #[must_use]
    pub fn resolve(&self, catalog: &EntityCatalog) -> Vec<Arc<ChargeableLocation>> {
        self.favorites
            .iter()
            .filter_map(|f| catalog.by_id(&f.id).cloned())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    fn insert(&mut self, favorite: FavoriteCharger) -> bool {
        if self.contains(&favorite.id) {
            return false;
        }
        self.favorites.push(favorite);
        true
    }
}

impl FavoriteLookup for FavoritesStore {
    fn is_favorite(&self, id: &str) -> bool {
        self.contains(id)
    }
}
