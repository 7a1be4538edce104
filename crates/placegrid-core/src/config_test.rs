use std::collections::HashMap;
use std::env::VarError;
use std::time::Duration;

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

/// Returns a map with all required env vars populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GOOGLE_API_KEY", "test-key");
    m
}

#[test]
fn build_app_config_fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GOOGLE_API_KEY"),
        "expected MissingEnvVar(GOOGLE_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GOOGLE_API_KEY"),
        "expected MissingEnvVar(GOOGLE_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.api_key, "test-key");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "placegrid/0.1 (area-sweep)");
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_ms, 1000);
    assert_eq!(cfg.max_pages, 3);
    assert_eq!(cfg.max_token_retries, 30);
    assert_eq!(cfg.photo_max_width, 800);
    assert_eq!(cfg.max_concurrent_tiles, 1);
    assert_eq!(cfg.max_concurrent_details, 1);
    assert_eq!(cfg.max_in_flight, 1);
}

#[test]
fn default_delays_match_sweep_defaults() {
    let cfg = build_app_config(lookup_from_map(&full_env())).unwrap();
    assert_eq!(cfg.delays(), crate::SweepDelays::default());
    assert_eq!(cfg.limits(), crate::SweepLimits::default());
}

#[test]
fn delay_overrides_flow_into_sweep_delays() {
    let mut map = full_env();
    map.insert("PLACEGRID_TOKEN_DELAY_MS", "0");
    map.insert("PLACEGRID_TILE_DELAY_MS", "75");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let delays = cfg.delays();
    assert_eq!(delays.token_ready, Duration::ZERO);
    assert_eq!(delays.after_tile, Duration::from_millis(75));
    assert_eq!(delays.after_detail, Duration::from_millis(250));
}

#[test]
fn max_pages_override() {
    let mut map = full_env();
    map.insert("PLACEGRID_MAX_PAGES", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.limits().max_pages, 5);
}

#[test]
fn max_pages_zero_is_rejected() {
    let mut map = full_env();
    map.insert("PLACEGRID_MAX_PAGES", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEGRID_MAX_PAGES"),
        "expected InvalidEnvVar(PLACEGRID_MAX_PAGES), got: {result:?}"
    );
}

#[test]
fn request_timeout_invalid() {
    let mut map = full_env();
    map.insert("PLACEGRID_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEGRID_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PLACEGRID_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn user_agent_override() {
    let mut map = full_env();
    map.insert("PLACEGRID_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}

#[test]
fn concurrency_overrides() {
    let mut map = full_env();
    map.insert("PLACEGRID_MAX_CONCURRENT_TILES", "4");
    map.insert("PLACEGRID_MAX_CONCURRENT_DETAILS", "8");
    map.insert("PLACEGRID_MAX_IN_FLIGHT", "2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_concurrent_tiles, 4);
    assert_eq!(cfg.max_concurrent_details, 8);
    assert_eq!(cfg.max_in_flight, 2);
}

#[test]
fn max_in_flight_invalid() {
    let mut map = full_env();
    map.insert("PLACEGRID_MAX_IN_FLIGHT", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEGRID_MAX_IN_FLIGHT"),
        "expected InvalidEnvVar(PLACEGRID_MAX_IN_FLIGHT), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let cfg = build_app_config(lookup_from_map(&full_env())).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-key"));
    assert!(rendered.contains("[redacted]"));
}
