//! The immutable charger catalog.
//!
//! A catalog is built once from a [`CatalogDocument`] (remote JSON, a file on
//! disk, or the bundled dataset) and never mutated afterwards. Entities are
//! shared behind [`Arc`] so derived sequences (filter results, rankings,
//! projections) can hold them without copying and without any way to write
//! back into the catalog.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::geo::Coordinates;

const BUNDLED_DOCUMENT: &str = include_str!("../data/chargers.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargerStatus {
    Active,
    Operational,
    Maintenance,
    ComingSoon,
}

impl ChargerStatus {
    pub const ALL: [ChargerStatus; 4] = [
        ChargerStatus::Active,
        ChargerStatus::Operational,
        ChargerStatus::Maintenance,
        ChargerStatus::ComingSoon,
    ];

    /// `active` and `operational` both mean the site can be used today.
    #[must_use]
    pub fn is_usable(self) -> bool {
        matches!(self, ChargerStatus::Active | ChargerStatus::Operational)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChargerStatus::Active => "active",
            ChargerStatus::Operational => "operational",
            ChargerStatus::Maintenance => "maintenance",
            ChargerStatus::ComingSoon => "coming_soon",
        }
    }

    /// Human label, e.g. `coming soon`.
    #[must_use]
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl std::fmt::Display for ChargerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChargerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        ChargerStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown status '{s}'; expected active, operational, maintenance or coming_soon")
            })
    }
}

/// A charging site as published by the entity source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeableLocation {
    pub id: String,
    pub name: String,
    #[serde(rename = "location")]
    pub coordinates: Coordinates,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    /// Number of stalls that can charge at the same time.
    #[serde(rename = "stalls")]
    pub capacity: u32,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    pub status: ChargerStatus,
}

/// The wire shape of the entity source: `{ chargers, lastUpdated }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    pub chargers: Vec<ChargeableLocation>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Parse a catalog document from JSON text.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] if the text is not a valid document.
pub fn parse_document(json: &str) -> Result<CatalogDocument, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    entries: Vec<Arc<ChargeableLocation>>,
    index: HashMap<String, usize>,
    last_updated: Option<DateTime<Utc>>,
}

impl EntityCatalog {
    /// Build a catalog from records in source order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two records share an id.
    pub fn new(chargers: Vec<ChargeableLocation>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(chargers.len());
        let mut entries = Vec::with_capacity(chargers.len());

        for (position, charger) in chargers.into_iter().enumerate() {
            if index.insert(charger.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(charger.id));
            }
            entries.push(Arc::new(charger));
        }

        Ok(Self {
            entries,
            index,
            last_updated: None,
        })
    }

    /// A catalog with no entities. Used when the entity source is unavailable.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two records share an id.
    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(document.chargers)?;
        catalog.last_updated = document.last_updated;
        Ok(catalog)
    }

    /// The dataset compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] only if the bundled file is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_document(parse_document(BUNDLED_DOCUMENT)?)
    }

    /// Read a catalog document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, or a parse /
    /// duplicate-id error for bad contents.
    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let catalog = Self::from_document(parse_document(&content)?)?;
        tracing::info!(path = %path.display(), chargers = catalog.len(), "loaded charger catalog");
        Ok(catalog)
    }

    /// Every entity, in source order.
    #[must_use]
    pub fn all(&self) -> &[Arc<ChargeableLocation>] {
        &self.entries
    }

    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Arc<ChargeableLocation>> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    #[must_use]
    pub fn by_status(&self, status: ChargerStatus) -> Vec<Arc<ChargeableLocation>> {
        self.entries
            .iter()
            .filter(|c| c.status == status)
            .cloned()
            .collect()
    }

    /// Exact, case-sensitive match on `country`.
    #[must_use]
    pub fn by_country(&self, country: &str) -> Vec<Arc<ChargeableLocation>> {
        self.entries
            .iter()
            .filter(|c| c.country == country)
            .cloned()
            .collect()
    }

    /// Distinct countries, sorted.
    #[must_use]
    pub fn countries(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|c| c.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct amenity tags across the catalog, sorted.
    #[must_use]
    pub fn amenities(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|c| c.amenities.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
