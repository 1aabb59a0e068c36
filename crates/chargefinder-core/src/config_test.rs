use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn config_with(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let map: HashMap<&str, &str> = pairs.iter().copied().collect();
    build_app_config(lookup_from_map(&map))
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(
        matches!(err, ConfigError::InvalidEnvVar { ref var, ref reason }
            if var == "CHARGEFINDER_ENV" && reason.contains("staging"))
    );
}

#[test]
fn empty_environment_uses_defaults() {
    let result = config_with(&[]);
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.catalog_path.is_none());
    assert!(cfg.google_maps_api_key.is_none());
    assert_eq!(cfg.places_base_url, DEFAULT_PLACES_BASE_URL);
    assert_eq!(cfg.places_timeout_secs, 10);
    assert_eq!(cfg.places_max_retries, 2);
    assert_eq!(cfg.places_retry_backoff_ms, 500);
    assert_eq!(cfg.rate_limit_max_requests, 120);
    assert_eq!(cfg.rate_limit_window_secs, 60);
}

#[test]
fn overrides_are_applied() {
    let cfg = config_with(&[
        ("CHARGEFINDER_ENV", "production"),
        ("CHARGEFINDER_BIND_ADDR", "127.0.0.1:8080"),
        ("CHARGEFINDER_CATALOG_PATH", "/srv/chargers.json"),
        ("GOOGLE_MAPS_API_KEY", "maps-key"),
        ("CHARGEFINDER_PLACES_TIMEOUT_SECS", "3"),
    ])
    .unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.bind_addr.port(), 8080);
    assert_eq!(
        cfg.catalog_path.as_deref(),
        Some(std::path::Path::new("/srv/chargers.json"))
    );
    assert_eq!(cfg.google_maps_api_key.as_deref(), Some("maps-key"));
    assert_eq!(cfg.places_timeout(), std::time::Duration::from_secs(3));
}

#[test]
fn unrecognised_variables_are_ignored() {
    let result = config_with(&[("CHARGEFINDER_SEARCH_DEBOUNCE_MS", "not-a-number")]);
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[test]
fn blank_optional_values_count_as_unset() {
    let cfg = config_with(&[
        ("GOOGLE_MAPS_API_KEY", ""),
        ("CHARGEFINDER_CATALOG_PATH", "  "),
    ])
    .unwrap();
    assert!(cfg.google_maps_api_key.is_none());
    assert!(cfg.catalog_path.is_none());
}

#[test]
fn invalid_bind_addr_fails() {
    let result = config_with(&[("CHARGEFINDER_BIND_ADDR", "not-a-socket-addr")]);
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CHARGEFINDER_BIND_ADDR"),
        "expected InvalidEnvVar(CHARGEFINDER_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn invalid_numbers_name_their_variable() {
    for var in [
        "CHARGEFINDER_PLACES_TIMEOUT_SECS",
        "CHARGEFINDER_PLACES_MAX_RETRIES",
        "CHARGEFINDER_PLACES_RETRY_BACKOFF_MS",
        "CHARGEFINDER_RATE_LIMIT_MAX_REQUESTS",
        "CHARGEFINDER_RATE_LIMIT_WINDOW_SECS",
    ] {
        let result = config_with(&[(var, "not-a-number")]);
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { var: ref v, .. }) if v == var),
            "expected InvalidEnvVar({var}), got: {result:?}"
        );
    }
}

#[test]
fn zero_rate_limit_window_fails() {
    let result = config_with(&[("CHARGEFINDER_RATE_LIMIT_WINDOW_SECS", "0")]);
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CHARGEFINDER_RATE_LIMIT_WINDOW_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn debug_redacts_api_key() {
    let cfg = config_with(&[("GOOGLE_MAPS_API_KEY", "super-secret")]).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
