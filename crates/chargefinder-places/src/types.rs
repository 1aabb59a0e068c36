//! Nearby-search request and response types.
//!
//! Field names follow the places API JSON so the server can pass results
//! through unchanged.

use chargefinder_core::Coordinates;
use serde::{Deserialize, Serialize};

/// Radius used by clients when the caller does not pick one.
pub const DEFAULT_RADIUS_M: u32 = 1000;

/// Radius the proxy route applies when the request omits it.
pub const PROXY_DEFAULT_RADIUS_M: u32 = 400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub vicinity: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,
}

impl Place {
    /// The first listed type, which the places API orders most specific first.
    #[must_use]
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchParams {
    pub location: Coordinates,
    pub radius_m: u32,
    /// A places type such as `restaurant`; see [`crate::display::PlaceType`].
    pub place_type: Option<String>,
    pub keyword: Option<String>,
}

impl NearbySearchParams {
    #[must_use]
    pub fn new(location: Coordinates) -> Self {
        Self {
            location,
            radius_m: DEFAULT_RADIUS_M,
            place_type: None,
            keyword: None,
        }
    }

    #[must_use]
    pub fn radius(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    #[must_use]
    pub fn place_type(mut self, place_type: impl Into<String>) -> Self {
        self.place_type = Some(place_type.into());
        self
    }

    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }
}

/// `{ results, status }` as returned by the places API and by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbySearchResponse {
    #[serde(default)]
    pub results: Vec<Place>,
    pub status: String,
    #[serde(default, skip_serializing)]
    pub error_message: Option<String>,
}

impl NearbySearchResponse {
    /// `OK` and `ZERO_RESULTS` are the only successful statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status.as_str(), "OK" | "ZERO_RESULTS")
    }
}
