use crate::app_config::{AppConfig, Environment};
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
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_ratio = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid(var, format!("{value} is outside 0.0..=1.0")));
        }
        Ok(value)
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("STOREBOT_ENV", "development"))?;

    let bind_addr = parse_addr("STOREBOT_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("STOREBOT_LOG_LEVEL", "info");
    let store_url = or_default("STOREBOT_STORE_URL", "https://silkandsaffron.store/");
    let store_name = or_default("STOREBOT_STORE_NAME", "Silk and Saffron");
    let lexicon_path = optional("STOREBOT_LEXICON_PATH").map(PathBuf::from);
    let match_threshold = parse_ratio("STOREBOT_MATCH_THRESHOLD", "0.3")?;
    let rate_limit_per_minute = parse_usize("STOREBOT_RATE_LIMIT_PER_MINUTE", "600")?;

    let db_max_connections = parse_u32("STOREBOT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("STOREBOT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("STOREBOT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs =
        parse_u64("STOREBOT_SCRAPER_REQUEST_TIMEOUT_SECS", "10")?;
    let scraper_user_agent = or_default(
        "STOREBOT_SCRAPER_USER_AGENT",
        "storebot/0.1 (storefront-catalog)",
    );
    let scraper_inter_request_delay_ms =
        parse_u64("STOREBOT_SCRAPER_INTER_REQUEST_DELAY_MS", "500")?;
    let scraper_max_retries = parse_u32("STOREBOT_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_secs =
        parse_u64("STOREBOT_SCRAPER_RETRY_BACKOFF_BASE_SECS", "2")?;
    let scraper_page_size = parse_u32("STOREBOT_SCRAPER_PAGE_SIZE", "250")?;
    let scrape_limit = parse_usize("STOREBOT_SCRAPE_LIMIT", "100")?;

    let gemini_api_key = optional("GEMINI_API_KEY");
    let llm_base_url = or_default(
        "STOREBOT_LLM_BASE_URL",
        "https://generativelanguage.googleapis.com/v1beta",
    );
    let llm_model = or_default("STOREBOT_LLM_MODEL", "gemini-2.0-flash-exp");
    let llm_timeout_secs = parse_u64("STOREBOT_LLM_TIMEOUT_SECS", "8")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        store_url,
        store_name,
        lexicon_path,
        match_threshold,
        rate_limit_per_minute,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        scraper_page_size,
        scrape_limit,
        gemini_api_key,
        llm_base_url,
        llm_model,
        llm_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREBOT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
