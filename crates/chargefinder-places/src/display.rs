//! Presentation helpers for places results.

/// Place types offered as quick filters around a charger.
pub struct PlaceType;

impl PlaceType {
    pub const RESTAURANT: &'static str = "restaurant";
    pub const CAFE: &'static str = "cafe";
    pub const SHOPPING: &'static str = "shopping_mall";
    pub const PARKING: &'static str = "parking";
    pub const HOTEL: &'static str = "lodging";
    pub const ENTERTAINMENT: &'static str = "tourist_attraction";
    pub const CONVENIENCE_STORE: &'static str = "convenience_store";
    pub const GAS_STATION: &'static str = "gas_station";

    pub const ALL: [&'static str; 8] = [
        Self::RESTAURANT,
        Self::CAFE,
        Self::SHOPPING,
        Self::PARKING,
        Self::HOTEL,
        Self::ENTERTAINMENT,
        Self::CONVENIENCE_STORE,
        Self::GAS_STATION,
    ];
}

/// Display label for a place type. Unknown types are title-cased with
/// underscores turned into spaces.
#[must_use]
pub fn format_place_type(place_type: &str) -> String {
    let known = match place_type {
        PlaceType::RESTAURANT => Some("Restaurant"),
        PlaceType::CAFE => Some("Cafe"),
        PlaceType::SHOPPING => Some("Shopping"),
        PlaceType::PARKING => Some("Parking"),
        PlaceType::HOTEL => Some("Hotel"),
        PlaceType::ENTERTAINMENT => Some("Entertainment"),
        PlaceType::CONVENIENCE_STORE => Some("Convenience Store"),
        PlaceType::GAS_STATION => Some("Gas Station"),
        _ => None,
    };
    if let Some(label) = known {
        return label.to_string();
    }

    place_type
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Five-star rendering: `★` per whole star, then `☆` for the rest, where a
/// fractional part of at least one half counts toward the rest as a single
/// star. Ratings outside `0..=5` are clamped.
#[must_use]
pub fn rating_stars(rating: f64) -> String {
    let rating = if rating.is_nan() { 0.0 } else { rating.clamp(0.0, 5.0) };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let full = rating.floor() as usize;
    let half = usize::from(rating.fract() >= 0.5);
    let empty = 5 - full - half;
    format!("{}{}", "★".repeat(full), "☆".repeat(half + empty))
}

/// `¥` repeated `level` times; empty for missing or zero.
#[must_use]
pub fn price_level(level: Option<u8>) -> String {
    match level {
        Some(n) if n > 0 => "¥".repeat(usize::from(n)),
        _ => String::new(),
    }
}
