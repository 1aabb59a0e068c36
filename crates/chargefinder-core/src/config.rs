use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from the process environment only.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parse and validate configuration through `lookup`, so tests can use a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Present-but-blank counts as unset for optional values.
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_var(var, &or_default(var, default))
    };

    let env = parse_environment(&or_default("CHARGEFINDER_ENV", "development"))?;
    let bind_addr: SocketAddr =
        parse_var("CHARGEFINDER_BIND_ADDR", &or_default("CHARGEFINDER_BIND_ADDR", "0.0.0.0:3000"))?;
    let log_level = or_default("CHARGEFINDER_LOG_LEVEL", "info");

    let catalog_path = optional("CHARGEFINDER_CATALOG_PATH").map(PathBuf::from);

    let google_maps_api_key = optional("GOOGLE_MAPS_API_KEY");
    let places_base_url = or_default("CHARGEFINDER_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    let places_timeout_secs = parse("CHARGEFINDER_PLACES_TIMEOUT_SECS", "10")?;
    let places_max_retries: u32 = parse_var(
        "CHARGEFINDER_PLACES_MAX_RETRIES",
        &or_default("CHARGEFINDER_PLACES_MAX_RETRIES", "2"),
    )?;
    let places_retry_backoff_ms = parse("CHARGEFINDER_PLACES_RETRY_BACKOFF_MS", "500")?;

    let rate_limit_max_requests: u32 = parse_var(
        "CHARGEFINDER_RATE_LIMIT_MAX_REQUESTS",
        &or_default("CHARGEFINDER_RATE_LIMIT_MAX_REQUESTS", "120"),
    )?;
    let rate_limit_window_secs = parse("CHARGEFINDER_RATE_LIMIT_WINDOW_SECS", "60")?;
    if rate_limit_window_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CHARGEFINDER_RATE_LIMIT_WINDOW_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_path,
        google_maps_api_key,
        places_base_url,
        places_timeout_secs,
        places_max_retries,
        places_retry_backoff_ms,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CHARGEFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
