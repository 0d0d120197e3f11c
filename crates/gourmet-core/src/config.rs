use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_HOTPEPPER_BASE_URL: &str = "https://webservice.recruit.co.jp/hotpepper/";

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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `KEY=` in a .env file does not enable anything.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("GOURMET_ENV", "development"))?;

    let bind_addr = or_default("GOURMET_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("GOURMET_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("GOURMET_LOG_LEVEL", "info");
    let access_log_enabled = parse_bool(
        "GOURMET_LOG_ENABLE_ACCESS",
        &or_default("GOURMET_LOG_ENABLE_ACCESS", "true"),
    )?;

    let hotpepper_api_key = optional("HOTPEPPER_API_KEY");
    let hotpepper_base_url = or_default("HOTPEPPER_BASE_URL", DEFAULT_HOTPEPPER_BASE_URL);
    let hotpepper_timeout_ms = parse_u64("HOTPEPPER_TIMEOUT_MS", "7000")?;
    if hotpepper_timeout_ms == 0 {
        return Err(invalid(
            "HOTPEPPER_TIMEOUT_MS",
            "must be greater than 0".to_string(),
        ));
    }
    let hotpepper_max_retries = parse_u32("HOTPEPPER_MAX_RETRIES", "1")?;
    let hotpepper_retry_delay_ms = parse_u64("HOTPEPPER_RETRY_DELAY_MS", "250")?;
    let hotpepper_user_agent = or_default("HOTPEPPER_USER_AGENT", "gourmet-bff/0.1");

    let area_fetch_concurrency = parse_usize("GOURMET_AREA_FETCH_CONCURRENCY", "4")?;
    if area_fetch_concurrency == 0 {
        return Err(invalid(
            "GOURMET_AREA_FETCH_CONCURRENCY",
            "must be greater than 0".to_string(),
        ));
    }

    let google_maps_api_key = optional("GOOGLE_MAPS_API_KEY");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        access_log_enabled,
        hotpepper_api_key,
        hotpepper_base_url,
        hotpepper_timeout_ms,
        hotpepper_max_retries,
        hotpepper_retry_delay_ms,
        hotpepper_user_agent,
        area_fetch_concurrency,
        google_maps_api_key,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GOURMET_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Accepts the usual spellings of a boolean flag, case-insensitively.
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
