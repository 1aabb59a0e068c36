//! Read-only charger queries: list, nearest, show and distance.

use std::sync::Arc;

use chargefinder_core::geo::{
    format_distance, formatted_distance_between, preferred_unit, walking_info, DEFAULT_DECIMALS,
};
use chargefinder_core::ranking::nearest_in;
use chargefinder_core::{
    AmenityMatch, ChargerStatus, Coordinates, DistanceUnit, EntityCatalog, FavoritesStore,
    FilterSpec, RankedLocation, ViewStateController,
};

/// Options collected from `list`.
#[derive(Debug, Default)]
pub(crate) struct ListArgs {
    pub search: Option<String>,
    pub statuses: Vec<ChargerStatus>,
    pub usable: bool,
    pub amenities: Vec<String>,
    pub match_all: bool,
    pub country: Option<String>,
    pub min_stalls: u32,
    pub favorites_only: bool,
    pub reference: Option<Coordinates>,
}

impl ListArgs {
    pub(crate) fn filter_spec(&self) -> FilterSpec {
        let spec = FilterSpec {
            statuses: self.statuses.iter().copied().collect(),
            amenities: self.amenities.iter().cloned().collect(),
            match_mode: if self.match_all {
                AmenityMatch::All
            } else {
                AmenityMatch::Any
            },
            country: self.country.clone(),
            min_capacity: self.min_stalls,
            favorites_only: self.favorites_only,
        };
        if self.usable {
            spec.with_usable_statuses()
        } else {
            spec
        }
    }
}

/// `--unit` wins; otherwise the locale's region decides. POSIX locales such
/// as `en_US.UTF-8` have their encoding suffix dropped first.
pub(crate) fn resolve_unit(unit: Option<DistanceUnit>, locale: Option<&str>) -> DistanceUnit {
    unit.unwrap_or_else(|| {
        let locale = locale
            .map(|l| l.split(['.', '@']).next().unwrap_or(l))
            .filter(|l| !l.is_empty() && *l != "C" && *l != "POSIX");
        preferred_unit(locale)
    })
}

/// The process locale, read with POSIX precedence: `LC_ALL`, then
/// `LC_MEASUREMENT`, then `LANG`. Unset or empty variables are skipped.
pub(crate) fn system_locale<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    ["LC_ALL", "LC_MEASUREMENT", "LANG"]
        .into_iter()
        .filter_map(lookup)
        .find(|value| !value.trim().is_empty())
}

pub(crate) fn reference_point(lat: Option<f64>, lng: Option<f64>) -> Option<Coordinates> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
        _ => None,
    }
}

/// Run the full search, filter and rank pipeline and return what a list view
/// would show.
pub(crate) fn list_projection(
    catalog: EntityCatalog,
    store: FavoritesStore,
    args: &ListArgs,
) -> Vec<RankedLocation> {
    let mut view = ViewStateController::new(Arc::new(catalog)).with_favorites(Box::new(store));
    view.set_filter_spec(args.filter_spec());
    view.set_reference_point(args.reference);
    if let Some(search) = &args.search {
        view.set_search_text(search.as_str());
        view.flush_search();
    }
    view.projection().to_vec()
}

pub(crate) fn run_list(
    catalog: EntityCatalog,
    store: FavoritesStore,
    args: &ListArgs,
    unit: DistanceUnit,
) {
    let total = catalog.len();
    let rows = list_projection(catalog, store, args);

    if rows.is_empty() {
        println!("no chargers match; try fewer filters");
        return;
    }

    print_table(&rows, unit);
    println!();
    println!("{} of {total} chargers", rows.len());
}

pub(crate) fn run_nearest(
    catalog: &EntityCatalog,
    point: Coordinates,
    limit: usize,
    unit: DistanceUnit,
) {
    let rows = nearest_in(catalog, point, limit);
    if rows.is_empty() {
        println!("no chargers to rank");
        return;
    }
    print_table(&rows, unit);
}

/// # Errors
///
/// Returns an error if no charger has `id`.
pub(crate) fn run_show(
    catalog: &EntityCatalog,
    store: &FavoritesStore,
    id: &str,
    from: Option<Coordinates>,
    unit: DistanceUnit,
) -> anyhow::Result<()> {
    let charger = catalog
        .by_id(id)
        .ok_or_else(|| anyhow::anyhow!("charger '{id}' not found"))?;

    let star = if store.contains(&charger.id) { " \u{2605}" } else { "" };
    println!("{}{star}", charger.name);
    println!("ID:        {}", charger.id);
    println!("Status:    {}", charger.status.label());
    println!(
        "Address:   {}, {}, {}, {}",
        charger.address, charger.city, charger.state, charger.country
    );
    println!("Stalls:    {}", charger.capacity);
    println!(
        "Location:  {:.4}, {:.4}",
        charger.coordinates.lat, charger.coordinates.lng
    );
    if charger.amenities.is_empty() {
        println!("Amenities: \u{2014}");
    } else {
        let amenities: Vec<String> = charger
            .amenities
            .iter()
            .map(|a| a.replace('_', " "))
            .collect();
        println!("Amenities: {}", amenities.join(", "));
    }

    if let Some(from) = from {
        let walk = walking_info(from, charger.coordinates);
        println!(
            "Distance:  {} ({})",
            formatted_distance_between(from, charger.coordinates, Some(unit), DEFAULT_DECIMALS),
            walk.walking_time
        );
    }

    if !charger.status.is_usable() {
        println!();
        println!("This site is not open for charging yet.");
    }

    Ok(())
}

pub(crate) fn run_distance(from: Coordinates, to: Coordinates, unit: DistanceUnit) {
    let walk = walking_info(from, to);
    println!(
        "{}",
        formatted_distance_between(from, to, Some(unit), DEFAULT_DECIMALS)
    );
    println!("{} m, {}", walk.distance_meters, walk.walking_time);
}

fn distance_cell(row: &RankedLocation, unit: DistanceUnit) -> String {
    row.distance_km.map_or_else(
        || "\u{2014}".to_string(),
        |km| format_distance(km, unit, DEFAULT_DECIMALS),
    )
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

fn print_table(rows: &[RankedLocation], unit: DistanceUnit) {
    println!(
        "{:<26}{:<30}{:<12}{:<8}{:<14}DISTANCE",
        "ID", "NAME", "CITY", "STALLS", "STATUS"
    );
    for row in rows {
        let charger = &row.location;
        println!(
            "{:<26}{:<30}{:<12}{:<8}{:<14}{}",
            charger.id,
            truncate(&charger.name, 28),
            truncate(&charger.city, 11),
            charger.capacity,
            charger.status.label(),
            distance_cell(row, unit)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled() -> EntityCatalog {
        EntityCatalog::bundled().expect("bundled catalog")
    }

    fn ids(rows: &[RankedLocation]) -> Vec<&str> {
        rows.iter().map(RankedLocation::id).collect()
    }

    #[test]
    fn unit_flag_overrides_locale() {
        assert_eq!(
            resolve_unit(Some(DistanceUnit::Km), Some("en-US")),
            DistanceUnit::Km
        );
    }

    #[test]
    fn posix_locale_suffix_is_ignored() {
        assert_eq!(resolve_unit(None, Some("en_GB.UTF-8")), DistanceUnit::Miles);
        assert_eq!(resolve_unit(None, Some("ja_JP.UTF-8")), DistanceUnit::Km);
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var: &str| {
            owned
                .iter()
                .find(|(k, _)| k == var)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn system_locale_follows_posix_precedence() {
        let lookup = env_from(&[("LANG", "en_US.UTF-8"), ("LC_MEASUREMENT", "ja_JP.UTF-8")]);
        assert_eq!(system_locale(lookup).as_deref(), Some("ja_JP.UTF-8"));

        let lookup = env_from(&[("LC_ALL", ""), ("LANG", "ja_JP.UTF-8")]);
        assert_eq!(system_locale(lookup).as_deref(), Some("ja_JP.UTF-8"));

        assert!(system_locale(env_from(&[])).is_none());
    }

    #[test]
    fn japanese_system_locale_picks_kilometers() {
        let locale = system_locale(env_from(&[("LANG", "ja_JP.UTF-8")]));
        assert_eq!(resolve_unit(None, locale.as_deref()), DistanceUnit::Km);
    }

    #[test]
    fn c_locale_uses_fallback() {
        assert_eq!(resolve_unit(None, Some("C")), preferred_unit(None));
        assert_eq!(resolve_unit(None, None), preferred_unit(None));
    }

    #[test]
    fn usable_flag_selects_active_and_operational() {
        let args = ListArgs {
            usable: true,
            ..ListArgs::default()
        };
        let spec = args.filter_spec();
        assert!(spec.statuses.contains(&ChargerStatus::Active));
        assert!(spec.statuses.contains(&ChargerStatus::Operational));
        assert_eq!(spec.statuses.len(), 2);
    }

    #[test]
    fn list_without_options_is_catalog_order() {
        let catalog = bundled();
        let expected: Vec<String> = catalog.all().iter().map(|c| c.id.clone()).collect();
        let rows = list_projection(catalog, FavoritesStore::new(), &ListArgs::default());
        assert_eq!(ids(&rows), expected);
        assert!(rows.iter().all(|r| r.distance_km.is_none()));
    }

    #[test]
    fn list_with_reference_point_is_ranked() {
        let args = ListArgs {
            reference: Some(Coordinates::new(35.6812, 139.7671)),
            ..ListArgs::default()
        };
        let rows = list_projection(bundled(), FavoritesStore::new(), &args);
        assert_eq!(rows[0].id(), "sc-tokyo-yaesu");
        let distances: Vec<f64> = rows.iter().filter_map(|r| r.distance_km).collect();
        assert_eq!(distances.len(), rows.len());
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn list_search_and_favorites_only_combine() {
        let catalog = bundled();
        let mut store = FavoritesStore::new();
        let yaesu = catalog.by_id("sc-tokyo-yaesu").expect("yaesu").clone();
        store.add(&yaesu);

        let args = ListArgs {
            search: Some("tokyo".to_string()),
            favorites_only: true,
            ..ListArgs::default()
        };
        let rows = list_projection(catalog, store, &args);
        assert_eq!(ids(&rows), vec!["sc-tokyo-yaesu"]);
    }

    #[test]
    fn show_unknown_charger_is_error() {
        let err = run_show(
            &bundled(),
            &FavoritesStore::new(),
            "sc-nowhere",
            None,
            DistanceUnit::Km,
        )
        .expect_err("unknown id");
        assert!(err.to_string().contains("sc-nowhere"));
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Tokyo", 11), "Tokyo");
        assert_eq!(truncate("Tokyo - Daikanyama T-Site", 12), "Tokyo - D...");
    }
}
