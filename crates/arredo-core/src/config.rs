use std::path::PathBuf;

use thiserror::Error;

use crate::app_config::{AppConfig, Environment};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let env = parse_environment(&or_default("ARREDO_ENV", "development"));
    let log_level = or_default("ARREDO_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("ARREDO_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ARREDO_USER_AGENT", "arredo/0.1 (catalog-extraction)");
    let max_retries = parse_u32("ARREDO_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("ARREDO_RETRY_BACKOFF_BASE_SECS", "5")?;
    let inter_request_delay_ms = parse_u64("ARREDO_INTER_REQUEST_DELAY_MS", "1000")?;
    let reveal_timeout_secs = parse_u64("ARREDO_REVEAL_TIMEOUT_SECS", "10")?;

    let sitemap_url = or_default(
        "ARREDO_SITEMAP_URL",
        "https://www.poltronafrau.com/ww/en/sitemap.xml",
    );
    let output_dir = PathBuf::from(or_default("ARREDO_OUTPUT_DIR", "./records"));

    Ok(AppConfig {
        env,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        inter_request_delay_ms,
        reveal_timeout_secs,
        sitemap_url,
        output_dir,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
