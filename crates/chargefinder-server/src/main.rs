mod api;
mod middleware;

use std::sync::Arc;

use chargefinder_core::EntityCatalog;
use chargefinder_places::PlacesClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = chargefinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "loaded configuration");

    let catalog = match &config.catalog_path {
        Some(path) => EntityCatalog::load_file(path)?,
        None => EntityCatalog::bundled()?,
    };
    tracing::info!(chargers = catalog.len(), "catalog ready");

    let places = match config.google_maps_api_key.as_deref() {
        Some(key) => Some(Arc::new(
            PlacesClient::with_base_url(key, config.places_timeout_secs, &config.places_base_url)?
                .with_retry(config.places_max_retries, config.places_retry_backoff_ms),
        )),
        None => {
            tracing::warn!("GOOGLE_MAPS_API_KEY not set; /api/places/nearby will answer 500");
            None
        }
    };

    let app = build_app(
        AppState::new(Arc::new(catalog), places),
        rate_limit_state(&config),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
