//! Where the CLI gets its charger catalog from.
//!
//! The remote document is preferred. Any failure to fetch or parse it falls
//! back to the dataset compiled into `chargefinder-core`.

use std::time::Duration;

use anyhow::Context;
use chargefinder_core::{parse_document, EntityCatalog};

/// Fetch timeout for the catalog document.
pub(crate) const CATALOG_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Load the catalog from `url`, or the bundled dataset when `url` is `None`
/// or the fetch fails.
///
/// # Errors
///
/// Returns an error only if the bundled dataset itself cannot be parsed.
pub(crate) async fn load_catalog(url: Option<&str>) -> anyhow::Result<EntityCatalog> {
    let Some(url) = url else {
        return Ok(EntityCatalog::bundled()?);
    };

    match fetch_catalog(url).await {
        Ok(catalog) => {
            tracing::info!(url, chargers = catalog.len(), "fetched charger catalog");
            Ok(catalog)
        }
        Err(e) => {
            tracing::warn!(url, error = %format!("{e:#}"), "catalog fetch failed; using bundled dataset");
            Ok(EntityCatalog::bundled()?)
        }
    }
}

async fn fetch_catalog(url: &str) -> anyhow::Result<EntityCatalog> {
    let client = reqwest::Client::builder()
        .timeout(CATALOG_FETCH_TIMEOUT)
        .user_agent("chargefinder-cli/0.1")
        .build()?;
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let document = parse_document(&body).context("malformed catalog document")?;
    Ok(EntityCatalog::from_document(document)?)
}
