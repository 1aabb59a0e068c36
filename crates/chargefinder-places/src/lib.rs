pub mod client;
pub mod display;
pub mod error;
pub mod proxy;
pub(crate) mod retry;
pub mod types;

pub use client::PlacesClient;
pub use display::{format_place_type, price_level, rating_stars, PlaceType};
pub use error::PlacesError;
pub use proxy::PlacesProxyClient;
pub use types::{
    Geometry, NearbySearchParams, NearbySearchResponse, OpeningHours, Place, DEFAULT_RADIUS_M,
    PROXY_DEFAULT_RADIUS_M,
};
