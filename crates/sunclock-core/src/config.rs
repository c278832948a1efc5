use std::time::Duration;

use crate::app_config::{AppConfig, ConfigUrls, Environment, GuardTimings, RelayVariant};
use crate::ConfigError;

const DEFAULT_CONFIG_BASE_URL: &str = "http://ewedel.github.io/pebble-sunclock/PebbleConfig/";
const DEFAULT_GEONAMES_BASE_URL: &str = "http://api.geonames.org/";
const DEFAULT_GEONAMES_USERNAME: &str = "TwilightSunclock";
const DEFAULT_FLARES_URL: &str = "http://img.kmrov.ru/iridium.html";
const DEFAULT_USER_AGENT: &str = "sunclock-relay/0.1";

/// Load relay configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load relay configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build relay configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a working
/// configuration pointed at the public services.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_millis = |var: &str, default: u64| -> Result<Duration, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(Duration::from_millis(default)),
        }
    };

    let env = parse_environment(&or_default("SUNCLOCK_ENV", "development"))?;
    let log_level = or_default("SUNCLOCK_LOG_LEVEL", "info");
    let variant = parse_variant(&or_default("SUNCLOCK_VARIANT", "full"))?;

    let base = or_default("SUNCLOCK_CONFIG_BASE_URL", DEFAULT_CONFIG_BASE_URL);
    let urls = ConfigUrls::from_base(&base).map_err(|e| ConfigError::InvalidEnvVar {
        var: "SUNCLOCK_CONFIG_BASE_URL".to_string(),
        reason: e.to_string(),
    })?;

    let geonames_base_url = or_default("SUNCLOCK_GEONAMES_BASE_URL", DEFAULT_GEONAMES_BASE_URL);
    let geonames_username = or_default("SUNCLOCK_GEONAMES_USERNAME", DEFAULT_GEONAMES_USERNAME);
    let flares_url = or_default("SUNCLOCK_FLARES_URL", DEFAULT_FLARES_URL);
    let user_agent = or_default("SUNCLOCK_USER_AGENT", DEFAULT_USER_AGENT);

    let defaults = GuardTimings::default();
    let timings = GuardTimings {
        location_guard: parse_millis("SUNCLOCK_LOCATION_GUARD_MS", millis(defaults.location_guard))?,
        location_timeout: parse_millis(
            "SUNCLOCK_LOCATION_TIMEOUT_MS",
            millis(defaults.location_timeout),
        )?,
        location_max_age: parse_millis(
            "SUNCLOCK_LOCATION_MAX_AGE_MS",
            millis(defaults.location_max_age),
        )?,
        geocode_guard: parse_millis("SUNCLOCK_GEOCODE_GUARD_MS", millis(defaults.geocode_guard))?,
        flares_guard: parse_millis("SUNCLOCK_FLARES_GUARD_MS", millis(defaults.flares_guard))?,
    };

    Ok(AppConfig {
        env,
        log_level,
        variant,
        urls,
        geonames_base_url,
        geonames_username,
        flares_url,
        user_agent,
        timings,
    })
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SUNCLOCK_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_variant(s: &str) -> Result<RelayVariant, ConfigError> {
    match s {
        "full" => Ok(RelayVariant::Full),
        "basic" => Ok(RelayVariant::Basic),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SUNCLOCK_VARIANT".to_string(),
            reason: format!("unknown variant '{other}' (expected 'full' or 'basic')"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
