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
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PROMOS_ENV"));
}

#[test]
fn build_app_config_uses_defaults_on_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");

    assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(cfg.env, Environment::Development);
    assert!(cfg.debug, "development defaults to debug mode");
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:5000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.db_max_connections, 5);
    assert_eq!(cfg.db_min_connections, 1);
    assert_eq!(cfg.db_acquire_timeout_secs, 10);
    assert_eq!(cfg.fetch_timeout_secs, 5);
    assert_eq!(cfg.fetch_user_agent, "promos/0.1 (promotion-ingest)");
}

#[test]
fn production_disables_debug_by_default() {
    let mut map = HashMap::new();
    map.insert("PROMOS_ENV", "production");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert!(!cfg.debug);
}

#[test]
fn debug_flag_overrides_environment_default() {
    let mut map = HashMap::new();
    map.insert("PROMOS_ENV", "production");
    map.insert("PROMOS_DEBUG", "true");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.debug);

    map.insert("PROMOS_ENV", "development");
    map.insert("PROMOS_DEBUG", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.debug);
}

#[test]
fn debug_flag_rejects_garbage() {
    let mut map = HashMap::new();
    map.insert("PROMOS_DEBUG", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PROMOS_DEBUG"),
        "expected InvalidEnvVar(PROMOS_DEBUG), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("PROMOS_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PROMOS_BIND_ADDR"),
        "expected InvalidEnvVar(PROMOS_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn fetch_timeout_override() {
    let mut map = HashMap::new();
    map.insert("PROMOS_FETCH_TIMEOUT_SECS", "12");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.fetch_timeout_secs, 12);
}

#[test]
fn fetch_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("PROMOS_FETCH_TIMEOUT_SECS", "five");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PROMOS_FETCH_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PROMOS_FETCH_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn database_url_override() {
    let mut map = HashMap::new();
    map.insert("DATABASE_URL", "sqlite::memory:");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.database_url, "sqlite::memory:");
}

#[test]
fn debug_output_redacts_database_url() {
    let mut map = HashMap::new();
    map.insert("DATABASE_URL", "sqlite:///secret/path.sqlite");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret"));
    assert!(rendered.contains("[redacted]"));
}
