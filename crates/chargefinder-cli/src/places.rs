//! Nearby places around a charger, fetched through the server proxy so the
//! maps API key never leaves the server.

use chargefinder_core::geo::walking_info;
use chargefinder_core::{ChargeableLocation, EntityCatalog};
use chargefinder_places::{
    format_place_type, price_level, rating_stars, NearbySearchParams, Place, PlacesProxyClient,
};

const PROXY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub(crate) struct PlacesArgs {
    pub place_type: Option<String>,
    pub keyword: Option<String>,
    pub radius: u32,
    pub server: String,
}

pub(crate) fn search_params(charger: &ChargeableLocation, args: &PlacesArgs) -> NearbySearchParams {
    let mut params = NearbySearchParams::new(charger.coordinates).radius(args.radius);
    if let Some(place_type) = args.place_type.as_deref().filter(|t| !t.is_empty()) {
        params = params.place_type(place_type);
    }
    if let Some(keyword) = args.keyword.as_deref().filter(|k| !k.is_empty()) {
        params = params.keyword(keyword);
    }
    params
}

/// Print places near the charger with `charger_id`.
///
/// An unreachable server or upstream failure prints an empty result rather
/// than failing the command.
///
/// # Errors
///
/// Returns an error if the charger is unknown or `args.server` is not a
/// valid URL.
pub(crate) async fn run_places(
    catalog: &EntityCatalog,
    charger_id: &str,
    args: PlacesArgs,
) -> anyhow::Result<()> {
    let charger = catalog
        .by_id(charger_id)
        .ok_or_else(|| anyhow::anyhow!("charger '{charger_id}' not found"))?;

    let proxy = PlacesProxyClient::new(&args.server, PROXY_TIMEOUT_SECS)?;
    let params = search_params(charger, &args);
    let places = proxy.nearby(&params).await;

    if places.is_empty() {
        println!("no places found within {} m of {}", args.radius, charger.name);
        return Ok(());
    }

    println!("Near {} ({} m)", charger.name, args.radius);
    println!();
    println!(
        "{:<32}{:<20}{:<8}{:<6}{:<8}WALK",
        "NAME", "TYPE", "RATING", "PRICE", "OPEN"
    );
    for place in &places {
        println!("{}", place_row(charger, place));
    }

    Ok(())
}

fn place_row(charger: &ChargeableLocation, place: &Place) -> String {
    let kind = place
        .primary_type()
        .map(format_place_type)
        .unwrap_or_default();
    let rating = place.rating.map(rating_stars).unwrap_or_default();
    let open = match place.opening_hours {
        Some(hours) if hours.open_now => "open",
        Some(_) => "closed",
        None => "",
    };
    let walk = walking_info(charger.coordinates, place.geometry.location);
    format!(
        "{:<32}{:<20}{:<8}{:<6}{:<8}{}",
        place.name,
        kind,
        rating,
        price_level(place.price_level),
        open,
        walk.walking_time
    )
}
