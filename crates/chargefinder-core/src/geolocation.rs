//! Boundary types for the device position provider.
//!
//! The provider itself lives in the shell. It hands the core either a
//! [`GeoPosition`] or a [`GeolocationError`]; both are normal states, and a
//! failure simply leaves the controller without a reference point.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinates;

/// A resolved device position. `timestamp` is milliseconds since the Unix
/// epoch, `accuracy` is in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub timestamp: u64,
}

impl GeoPosition {
    #[must_use]
    pub fn reference_point(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl From<GeoPosition> for Coordinates {
    fn from(position: GeoPosition) -> Self {
        position.reference_point()
    }
}

/// Provider failures, numbered the way positioning APIs report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported on this device")]
    Unsupported,
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location is unavailable")]
    PositionUnavailable,
    #[error("timed out waiting for a location fix")]
    Timeout,
}

impl GeolocationError {
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Unsupported => 0,
            Self::PermissionDenied => 1,
            Self::PositionUnavailable => 2,
            Self::Timeout => 3,
        }
    }

    /// Unknown codes are reported as unavailable.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Unsupported,
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::PositionUnavailable,
        }
    }

    /// Whether asking again could succeed without user action.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::PositionUnavailable | Self::Timeout)
    }
}

/// Options passed through to the position provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the provider may return.
    pub maximum_age: Duration,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Progress of a single position request as seen by the shell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum LocationState {
    #[default]
    Idle,
    Locating,
    Located(GeoPosition),
    Failed(GeolocationError),
}

impl LocationState {
    /// Apply a provider result. A failure discards any earlier fix.
    #[must_use]
    pub fn resolve(result: Result<GeoPosition, GeolocationError>) -> Self {
        match result {
            Ok(position) => Self::Located(position),
            Err(e) => {
                tracing::warn!(code = e.code(), error = %e, "geolocation failed");
                Self::Failed(e)
            }
        }
    }

    #[must_use]
    pub fn reference_point(&self) -> Option<Coordinates> {
        match self {
            Self::Located(position) => Some(position.reference_point()),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<GeolocationError> {
        match self {
            Self::Failed(e) => Some(*e),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_locating(&self) -> bool {
        matches!(self, Self::Locating)
    }
}
