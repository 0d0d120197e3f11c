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

fn env_with<'a>(pairs: &[(&'a str, &'a str)]) -> HashMap<&'a str, &'a str> {
    pairs.iter().copied().collect()
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
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GOURMET_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.access_log_enabled);
    assert!(cfg.hotpepper_api_key.is_none());
    assert_eq!(cfg.hotpepper_base_url, DEFAULT_HOTPEPPER_BASE_URL);
    assert_eq!(cfg.hotpepper_timeout_ms, 7000);
    assert_eq!(cfg.hotpepper_max_retries, 1);
    assert_eq!(cfg.hotpepper_retry_delay_ms, 250);
    assert_eq!(cfg.hotpepper_user_agent, "gourmet-bff/0.1");
    assert_eq!(cfg.area_fetch_concurrency, 4);
    assert!(cfg.google_maps_api_key.is_none());
}

#[test]
fn build_app_config_reads_api_key() {
    let map = env_with(&[("HOTPEPPER_API_KEY", "secret-key")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.hotpepper_api_key.as_deref(), Some("secret-key"));
}

#[test]
fn build_app_config_treats_blank_api_key_as_unset() {
    let map = env_with(&[("HOTPEPPER_API_KEY", "   ")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.hotpepper_api_key.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let map = env_with(&[("GOURMET_BIND_ADDR", "not-a-socket-addr")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GOURMET_BIND_ADDR"),
        "expected InvalidEnvVar(GOURMET_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_parses_access_log_flag() {
    for (raw, expected) in [("false", false), ("0", false), ("OFF", false), ("yes", true)] {
        let map = env_with(&[("GOURMET_LOG_ENABLE_ACCESS", raw)]);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.access_log_enabled, expected, "value {raw}");
    }
}

#[test]
fn build_app_config_rejects_garbage_access_log_flag() {
    let map = env_with(&[("GOURMET_LOG_ENABLE_ACCESS", "maybe")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GOURMET_LOG_ENABLE_ACCESS"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_timeout_override() {
    let map = env_with(&[("HOTPEPPER_TIMEOUT_MS", "1500")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.hotpepper_timeout_ms, 1500);
}

#[test]
fn build_app_config_timeout_invalid() {
    let map = env_with(&[("HOTPEPPER_TIMEOUT_MS", "not-a-number")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HOTPEPPER_TIMEOUT_MS"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_timeout_zero_rejected() {
    let map = env_with(&[("HOTPEPPER_TIMEOUT_MS", "0")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn build_app_config_max_retries_override() {
    let map = env_with(&[("HOTPEPPER_MAX_RETRIES", "0")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.hotpepper_max_retries, 0);
}

#[test]
fn build_app_config_area_concurrency_zero_rejected() {
    let map = env_with(&[("GOURMET_AREA_FETCH_CONCURRENCY", "0")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GOURMET_AREA_FETCH_CONCURRENCY"),
        "got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_keys() {
    let map = env_with(&[
        ("HOTPEPPER_API_KEY", "super-secret"),
        ("GOOGLE_MAPS_API_KEY", "maps-secret"),
    ]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(!rendered.contains("maps-secret"));
    assert!(rendered.contains("[redacted]"));
}
