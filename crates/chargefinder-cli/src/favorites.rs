//! Favorites persisted to a JSON file next to the user.
//!
//! The file holds the same versioned blob a browser would keep under
//! `chargefinder-favorites`, so the two are interchangeable.

use std::path::Path;

use anyhow::Context;
use chargefinder_core::{EntityCatalog, FavoritesStore};
use clap::Subcommand;

/// Sub-commands available under `favorites`.
#[derive(Debug, Subcommand)]
pub enum FavoritesCommands {
    /// Save a charger by id
    Add { id: String },
    /// Forget a saved charger
    Remove { id: String },
    /// Show saved chargers
    List,
    /// Forget every saved charger
    Clear,
}

/// Read the store at `path`. A missing file is an empty store; a corrupt one
/// is logged and treated as empty.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub(crate) fn load_store(path: &Path) -> anyhow::Result<FavoritesStore> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(e).with_context(|| format!("reading favorites from {}", path.display()))
        }
    };
    Ok(FavoritesStore::load_or_default(contents.as_deref()))
}

/// # Errors
///
/// Returns an error if the store cannot be serialized or written.
pub(crate) fn save_store(path: &Path, store: &FavoritesStore) -> anyhow::Result<()> {
    let json = store.to_json()?;
    std::fs::write(path, json)
        .with_context(|| format!("writing favorites to {}", path.display()))?;
    tracing::debug!(path = %path.display(), favorites = store.len(), "saved favorites");
    Ok(())
}

/// Dispatch a `favorites` sub-command against the store at `path`.
///
/// # Errors
///
/// Returns an error if the charger to add is unknown or the store cannot be
/// read or written.
pub(crate) fn run_favorites(
    catalog: &EntityCatalog,
    path: &Path,
    command: FavoritesCommands,
) -> anyhow::Result<()> {
    let mut store = load_store(path)?;

    match command {
        FavoritesCommands::Add { id } => {
            let charger = catalog
                .by_id(&id)
                .ok_or_else(|| anyhow::anyhow!("charger '{id}' not found"))?;
            if store.add(charger) {
                save_store(path, &store)?;
                println!("saved {} ({})", charger.name, charger.id);
            } else {
                println!("{} is already a favorite", charger.id);
            }
        }
        FavoritesCommands::Remove { id } => {
            if store.remove(&id) {
                save_store(path, &store)?;
                println!("removed {id}");
            } else {
                println!("{id} is not a favorite");
            }
        }
        FavoritesCommands::List => print_favorites(catalog, &store),
        FavoritesCommands::Clear => {
            let count = store.len();
            store.clear();
            save_store(path, &store)?;
            println!("cleared {count} favorite(s)");
        }
    }

    Ok(())
}

fn print_favorites(catalog: &EntityCatalog, store: &FavoritesStore) {
    if store.is_empty() {
        println!("no favorites saved; run `favorites add <id>` first");
        return;
    }

    println!("{:<26}{:<30}{:<14}STATUS", "ID", "NAME", "CITY");
    for favorite in store.list() {
        // Saved entries outlive catalog refreshes; show them even when gone.
        let status = catalog
            .by_id(&favorite.id)
            .map_or_else(|| "\u{2014}".to_string(), |c| c.status.label());
        println!(
            "{:<26}{:<30}{:<14}{}",
            favorite.id, favorite.name, favorite.city, status
        );
    }
}
