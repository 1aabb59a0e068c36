mod favorites;
mod places;
mod query;
mod source;

use std::path::PathBuf;

use chargefinder_core::{ChargerStatus, Coordinates, DistanceUnit, DEFAULT_NEAREST_LIMIT};
use chargefinder_places::DEFAULT_RADIUS_M;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::favorites::FavoritesCommands;

#[derive(Debug, Parser)]
#[command(name = "chargefinder-cli")]
#[command(about = "Find charging stations near you")]
struct Cli {
    /// URL of the charger catalog document
    #[arg(long, global = true, env = "CHARGEFINDER_CATALOG_URL")]
    catalog_url: Option<String>,
    /// Use the bundled catalog without touching the network
    #[arg(long, global = true)]
    offline: bool,
    /// Where favorites are persisted
    #[arg(
        long,
        global = true,
        env = "CHARGEFINDER_FAVORITES_PATH",
        default_value = "chargefinder-favorites.json"
    )]
    favorites_file: PathBuf,
    /// Locale used to pick km or miles (e.g., en-GB); defaults to LC_ALL/LANG
    #[arg(long, global = true, env = "CHARGEFINDER_LOCALE")]
    locale: Option<String>,
    /// Distance unit; overrides the locale
    #[arg(long, global = true)]
    unit: Option<DistanceUnit>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List chargers, optionally searched, filtered and ranked by distance
    List {
        /// Case-insensitive search over name, city and address
        #[arg(long)]
        search: Option<String>,
        /// Only chargers with this status (repeatable)
        #[arg(long = "status")]
        statuses: Vec<ChargerStatus>,
        /// Only chargers that can be used now (active or operational)
        #[arg(long, conflicts_with = "statuses")]
        usable: bool,
        /// Only chargers offering this amenity (repeatable)
        #[arg(long = "amenity")]
        amenities: Vec<String>,
        /// Require every --amenity instead of any of them
        #[arg(long)]
        match_all: bool,
        /// Exact country name (e.g., Japan)
        #[arg(long)]
        country: Option<String>,
        /// Minimum number of stalls
        #[arg(long, default_value_t = 0)]
        min_stalls: u32,
        /// Only chargers saved as favorites
        #[arg(long)]
        favorites_only: bool,
        /// Latitude to rank results from
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude to rank results from
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },
    /// Show the chargers closest to a point
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Maximum number of chargers to show
        #[arg(long, default_value_t = DEFAULT_NEAREST_LIMIT)]
        limit: usize,
    },
    /// Show one charger in detail
    Show {
        /// Charger id (e.g., sc-tokyo-roppongi)
        id: String,
        /// Your latitude, to include distance and walking time
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Your longitude, to include distance and walking time
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },
    /// Places to visit near a charger, via the chargefinder server
    Places {
        /// Charger id to search around
        charger_id: String,
        /// Places type (e.g., restaurant, cafe)
        #[arg(long = "type")]
        place_type: Option<String>,
        /// Keyword to match
        #[arg(long)]
        keyword: Option<String>,
        /// Search radius in meters
        #[arg(long, default_value_t = DEFAULT_RADIUS_M)]
        radius: u32,
        /// Origin of the chargefinder server
        #[arg(long, env = "CHARGEFINDER_SERVER_URL", default_value = "http://localhost:3000")]
        server: String,
    },
    /// Great-circle distance and walking time between two points
    Distance {
        #[arg(long, allow_negative_numbers = true)]
        from_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        from_lng: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lng: f64,
    },
    /// Manage saved chargers
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("chargefinder-cli ready; run with --help for commands");
        return Ok(());
    };

    let locale = cli
        .locale
        .clone()
        .or_else(|| query::system_locale(|var| std::env::var(var).ok()));
    let unit = query::resolve_unit(cli.unit, locale.as_deref());
    let catalog_url = if cli.offline {
        None
    } else {
        cli.catalog_url.as_deref()
    };

    match command {
        Commands::Distance {
            from_lat,
            from_lng,
            to_lat,
            to_lng,
        } => {
            query::run_distance(
                Coordinates::new(from_lat, from_lng),
                Coordinates::new(to_lat, to_lng),
                unit,
            );
        }
        Commands::List {
            search,
            statuses,
            usable,
            amenities,
            match_all,
            country,
            min_stalls,
            favorites_only,
            lat,
            lng,
        } => {
            let catalog = source::load_catalog(catalog_url).await?;
            let store = favorites::load_store(&cli.favorites_file)?;
            let args = query::ListArgs {
                search,
                statuses,
                usable,
                amenities,
                match_all,
                country,
                min_stalls,
                favorites_only,
                reference: query::reference_point(lat, lng),
            };
            query::run_list(catalog, store, &args, unit);
        }
        Commands::Nearest { lat, lng, limit } => {
            let catalog = source::load_catalog(catalog_url).await?;
            query::run_nearest(
                &catalog,
                Coordinates::new(lat, lng),
                limit,
                unit,
            );
        }
        Commands::Show { id, lat, lng } => {
            let catalog = source::load_catalog(catalog_url).await?;
            let store = favorites::load_store(&cli.favorites_file)?;
            query::run_show(&catalog, &store, &id, query::reference_point(lat, lng), unit)?;
        }
        Commands::Places {
            charger_id,
            place_type,
            keyword,
            radius,
            server,
        } => {
            let catalog = source::load_catalog(catalog_url).await?;
            places::run_places(
                &catalog,
                &charger_id,
                places::PlacesArgs {
                    place_type,
                    keyword,
                    radius,
                    server,
                },
            )
            .await?;
        }
        Commands::Favorites { command } => {
            let catalog = source::load_catalog(catalog_url).await?;
            favorites::run_favorites(&catalog, &cli.favorites_file, command)?;
        }
    }

    Ok(())
}
