use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        match raw.parse::<usize>() {
            Ok(0) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            }),
            Ok(value) => Ok(value),
            Err(e) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        }
    };

    let api_key = require("GOOGLE_API_KEY")?;

    let log_level = or_default("PLACEGRID_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("PLACEGRID_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PLACEGRID_USER_AGENT", "placegrid/0.1 (area-sweep)");
    let max_retries = parse_u32("PLACEGRID_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("PLACEGRID_RETRY_BACKOFF_BASE_MS", "1000")?;

    let max_pages = parse_positive_usize("PLACEGRID_MAX_PAGES", "3")?;
    let max_token_retries = parse_u32("PLACEGRID_MAX_TOKEN_RETRIES", "30")?;

    let token_delay_ms = parse_u64("PLACEGRID_TOKEN_DELAY_MS", "2000")?;
    let not_ready_delay_ms = parse_u64("PLACEGRID_NOT_READY_DELAY_MS", "2000")?;
    let page_delay_ms = parse_u64("PLACEGRID_PAGE_DELAY_MS", "1000")?;
    let tile_delay_ms = parse_u64("PLACEGRID_TILE_DELAY_MS", "500")?;
    let detail_delay_ms = parse_u64("PLACEGRID_DETAIL_DELAY_MS", "250")?;

    let photo_max_width = parse_u32("PLACEGRID_PHOTO_MAX_WIDTH", "800")?;

    let max_concurrent_tiles = parse_positive_usize("PLACEGRID_MAX_CONCURRENT_TILES", "1")?;
    let max_concurrent_details = parse_positive_usize("PLACEGRID_MAX_CONCURRENT_DETAILS", "1")?;
    let max_in_flight = parse_positive_usize("PLACEGRID_MAX_IN_FLIGHT", "1")?;

    Ok(AppConfig {
        api_key,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        max_pages,
        max_token_retries,
        token_delay_ms,
        not_ready_delay_ms,
        page_delay_ms,
        tile_delay_ms,
        detail_delay_ms,
        photo_max_width,
        max_concurrent_tiles,
        max_concurrent_details,
        max_in_flight,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
