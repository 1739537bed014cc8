use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://promotions.sqlite?mode=rwc";

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

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = or_default("DATABASE_URL", DEFAULT_DATABASE_URL);
    let env = parse_environment(&or_default("PROMOS_ENV", "development"))?;

    let debug = match lookup("PROMOS_DEBUG") {
        Ok(raw) => parse_bool(&raw).ok_or_else(|| {
            invalid("PROMOS_DEBUG", format!("expected true/false, got \"{raw}\""))
        })?,
        Err(_) => env == Environment::Development,
    };

    let bind_addr = parse_addr("PROMOS_BIND_ADDR", "127.0.0.1:5000")?;
    let log_level = or_default("PROMOS_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("PROMOS_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("PROMOS_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("PROMOS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let fetch_timeout_secs = parse_u64("PROMOS_FETCH_TIMEOUT_SECS", "5")?;
    let fetch_user_agent = or_default("PROMOS_FETCH_USER_AGENT", "promos/0.1 (promotion-ingest)");

    Ok(AppConfig {
        database_url,
        env,
        debug,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        fetch_timeout_secs,
        fetch_user_agent,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PROMOS_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
