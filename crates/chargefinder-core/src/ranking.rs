//! Order-by-distance-and-truncate.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{ChargeableLocation, EntityCatalog};
use crate::geo::Coordinates;

/// Result count used when a caller does not pass a limit.
pub const DEFAULT_NEAREST_LIMIT: usize = 5;

/// An entity paired with its distance from the reference point.
///
/// `distance_km` is `None` when no reference point was available. Serializes
/// as the entity's own fields plus `distance`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLocation {
    #[serde(flatten)]
    pub location: Arc<ChargeableLocation>,
    #[serde(rename = "distance")]
    pub distance_km: Option<f64>,
}

impl RankedLocation {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.location.id
    }
}

/// The `limit` entities nearest to `point`, closest first.
///
/// Sorting is stable: entities at equal distance keep their input order.
/// A `limit` above `entities.len()` returns everything; `0` returns nothing.
#[must_use]
pub fn nearest(
    point: Coordinates,
    limit: usize,
    entities: &[Arc<ChargeableLocation>],
) -> Vec<RankedLocation> {
    if limit == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<RankedLocation> = entities
        .iter()
        .map(|entity| RankedLocation {
            distance_km: Some(point.distance_km(entity.coordinates)),
            location: Arc::clone(entity),
        })
        .collect();

    // `sort_by` is a stable merge sort.
    ranked.sort_by(|a, b| {
        let a = a.distance_km.unwrap_or(f64::INFINITY);
        let b = b.distance_km.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
    ranked.truncate(limit);
    ranked
}

/// [`nearest`] over the whole catalog.
#[must_use]
pub fn nearest_in(catalog: &EntityCatalog, point: Coordinates, limit: usize) -> Vec<RankedLocation> {
    nearest(point, limit, catalog.all())
}

/// Wrap entities without a reference point: input order, `distance_km = None`.
#[must_use]
pub fn unranked(entities: &[Arc<ChargeableLocation>]) -> Vec<RankedLocation> {
    entities
        .iter()
        .map(|entity| RankedLocation {
            location: Arc::clone(entity),
            distance_km: None,
        })
        .collect()
}
