//! Great-circle distance and unit helpers.
//!
//! Pure functions only. Inputs are assumed to be well-formed degrees; NaN
//! propagates through every function unchanged.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Miles per kilometer.
pub const MILES_PER_KM: f64 = 0.621_371;

/// Average walking pace used for walking-time estimates.
pub const DEFAULT_WALKING_SPEED_KMH: f64 = 4.5;

/// Decimal places used when a caller does not ask for a specific precision.
pub const DEFAULT_DECIMALS: usize = 1;

/// Locale assumed when no locale context is available.
pub const FALLBACK_LOCALE: &str = "en-US";

/// Regions whose road signage is in miles.
const MILE_REGIONS: [&str; 4] = ["US", "GB", "MM", "LR"];

/// A latitude/longitude pair in degrees.
///
/// Serialized as `{"lat": .., "lng": ..}` to match the charger source document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine distance to `other` in kilometers.
    #[must_use]
    pub fn distance_km(self, other: Self) -> f64 {
        distance_km(self.lat, self.lng, other.lat, other.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Km,
    Miles,
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceUnit::Km => write!(f, "km"),
            DistanceUnit::Miles => write!(f, "miles"),
        }
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "km" | "kilometers" => Ok(DistanceUnit::Km),
            "mi" | "miles" => Ok(DistanceUnit::Miles),
            other => Err(format!("unknown distance unit '{other}'; expected km or miles")),
        }
    }
}

/// Great-circle distance between two points via the haversine formula.
///
/// `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)`,
/// `c = 2·atan2(√a, √(1−a))`, `d = R·c`. Identical inputs give exactly `0.0`.
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + lat1.to_radians().cos()
            * lat2.to_radians().cos()
            * (d_lon / 2.0).sin()
            * (d_lon / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[must_use]
pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

/// Render a kilometer distance as `"<v> km"` or `"<v> mi"` with `decimals`
/// fixed places, converting to miles first when asked.
#[must_use]
pub fn format_distance(km: f64, unit: DistanceUnit, decimals: usize) -> String {
    match unit {
        DistanceUnit::Miles => format!("{:.decimals$} mi", km_to_miles(km)),
        DistanceUnit::Km => format!("{km:.decimals$} km"),
    }
}

/// Distance unit customarily used in `locale`'s region.
///
/// The region is the second `-`/`_` separated subtag (`en-GB` → `GB`); a
/// locale without one is treated as a bare region code (`us` → `US`).
/// `None` falls back to [`FALLBACK_LOCALE`].
#[must_use]
pub fn preferred_unit(locale: Option<&str>) -> DistanceUnit {
    let locale = locale.unwrap_or(FALLBACK_LOCALE);
    let region = locale
        .split(['-', '_'])
        .nth(1)
        .map_or_else(|| locale.to_uppercase(), str::to_uppercase);

    if MILE_REGIONS.contains(&region.as_str()) {
        DistanceUnit::Miles
    } else {
        DistanceUnit::Km
    }
}

/// Minutes needed to walk `km` at `speed_kmh`, rounded half away from zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn walking_time_minutes(km: f64, speed_kmh: f64) -> i64 {
    (km / speed_kmh * 60.0).round() as i64
}

#[must_use]
pub fn format_walking_time(minutes: i64) -> String {
    if minutes < 1 {
        return "Less than 1 min".to_string();
    }
    if minutes == 1 {
        return "1 min walk".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} min walk");
    }

    let hours = minutes / 60;
    let remainder = minutes % 60;
    let plural = if hours > 1 { "s" } else { "" };
    if remainder == 0 {
        format!("{hours} hour{plural} walk")
    } else {
        format!("{hours} hour{plural} {remainder} min walk")
    }
}

/// Distance between two points rendered in `unit`, or in the fallback
/// locale's unit when `unit` is `None`.
#[must_use]
pub fn formatted_distance_between(
    from: Coordinates,
    to: Coordinates,
    unit: Option<DistanceUnit>,
    decimals: usize,
) -> String {
    let unit = unit.unwrap_or_else(|| preferred_unit(None));
    format_distance(from.distance_km(to), unit, decimals)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkingInfo {
    pub distance_meters: i64,
    pub walking_time: String,
}

/// Walking distance (whole meters) and a display string for the walk.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn walking_info(from: Coordinates, to: Coordinates) -> WalkingInfo {
    let km = from.distance_km(to);
    WalkingInfo {
        distance_meters: (km * 1000.0).round() as i64,
        walking_time: format_walking_time(walking_time_minutes(km, DEFAULT_WALKING_SPEED_KMH)),
    }
}
