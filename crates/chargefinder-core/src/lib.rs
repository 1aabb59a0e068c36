pub mod app_config;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod geo;
pub mod geolocation;
pub mod ranking;
pub mod view_state;

#[cfg(test)]
pub(crate) mod test_support;

pub use app_config::{AppConfig, Environment};
pub use catalog::{parse_document, CatalogDocument, ChargeableLocation, ChargerStatus, EntityCatalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{CatalogError, ConfigError};
pub use favorites::{FavoriteCharger, FavoritesStore};
pub use filter::{AmenityMatch, FavoriteLookup, FilterSpec};
pub use geo::{Coordinates, DistanceUnit};
pub use geolocation::{GeoPosition, GeolocationError, LocationState};
pub use ranking::{nearest, RankedLocation, DEFAULT_NEAREST_LIMIT};
pub use view_state::ViewStateController;
