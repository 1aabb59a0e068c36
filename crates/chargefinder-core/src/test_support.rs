//! Fixture builders shared by the unit tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::catalog::{ChargeableLocation, ChargerStatus, EntityCatalog};
use crate::geo::Coordinates;

pub(crate) fn charger(id: &str, lat: f64, lng: f64) -> ChargeableLocation {
    ChargeableLocation {
        id: id.to_string(),
        name: format!("Charger {id}"),
        coordinates: Coordinates::new(lat, lng),
        address: format!("{id} Main Street"),
        city: "Springfield".to_string(),
        state: "Somestate".to_string(),
        country: "Japan".to_string(),
        capacity: 8,
        amenities: BTreeSet::new(),
        status: ChargerStatus::Active,
    }
}

pub(crate) fn with_amenities(mut c: ChargeableLocation, tags: &[&str]) -> ChargeableLocation {
    c.amenities = tags.iter().map(|t| (*t).to_string()).collect();
    c
}

pub(crate) fn shared(chargers: Vec<ChargeableLocation>) -> Vec<Arc<ChargeableLocation>> {
    chargers.into_iter().map(Arc::new).collect()
}

/// The three-site San Francisco fixture: `1` and `2` are ~1.4 km apart,
/// `3` is across the bay in Oakland.
pub(crate) fn bay_area() -> Vec<ChargeableLocation> {
    vec![
        charger("1", 37.7749, -122.4194),
        charger("2", 37.7849, -122.4094),
        charger("3", 37.8044, -122.2712),
    ]
}

/// A small mixed catalog exercising every filter clause.
pub(crate) fn mixed_catalog() -> EntityCatalog {
    let mut roppongi = with_amenities(
        charger("roppongi", 35.6627, 139.7318),
        &["restaurants", "shopping", "restrooms"],
    );
    roppongi.name = "Tokyo - Roppongi".to_string();
    roppongi.city = "Tokyo".to_string();
    roppongi.address = "6-10-1 Roppongi, Minato-ku".to_string();
    roppongi.capacity = 6;

    let mut odaiba = with_amenities(
        charger("odaiba", 35.6269, 139.7744),
        &["restaurants", "parking"],
    );
    odaiba.name = "Tokyo - Odaiba".to_string();
    odaiba.city = "Tokyo".to_string();
    odaiba.address = "1-3-15 Ariake, Koto-ku".to_string();
    odaiba.capacity = 12;
    odaiba.status = ChargerStatus::Operational;

    let mut umeda = with_amenities(charger("umeda", 34.7055, 135.4983), &["coffee"]);
    umeda.name = "Osaka - Umeda".to_string();
    umeda.city = "Osaka".to_string();
    umeda.address = "3-1-3 Umeda, Kita-ku".to_string();
    umeda.capacity = 4;
    umeda.status = ChargerStatus::Maintenance;

    let mut seoul = with_amenities(
        charger("gangnam", 37.4979, 127.0276),
        &["parking", "restrooms"],
    );
    seoul.name = "Seoul - Gangnam".to_string();
    seoul.city = "Seoul".to_string();
    seoul.address = "396 Gangnam-daero".to_string();
    seoul.country = "South Korea".to_string();
    seoul.capacity = 10;
    seoul.status = ChargerStatus::ComingSoon;

    EntityCatalog::new(vec![roppongi, odaiba, umeda, seoul]).expect("fixture ids are unique")
}
