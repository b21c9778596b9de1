use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::ConfigError;

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

/// Build application configuration using the provided env-var lookup function,
/// so parsing can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("KOLBOARD_LOG_LEVEL", "info");
    let presets_path = PathBuf::from(or_default(
        "KOLBOARD_PRESETS_PATH",
        "./config/presets.yaml",
    ));

    let max_concurrent_profiles = parse_usize("KOLBOARD_MAX_CONCURRENT_PROFILES", "4")?;
    if max_concurrent_profiles == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "KOLBOARD_MAX_CONCURRENT_PROFILES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let tier_table = parse_selector(
        &or_default("KOLBOARD_TIER_TABLE", "standard"),
        "KOLBOARD_TIER_TABLE",
    )?;
    let untiered_policy = parse_selector(
        &or_default("KOLBOARD_UNTIERED_POLICY", "show-as-nano"),
        "KOLBOARD_UNTIERED_POLICY",
    )?;
    let merge_policy = parse_selector(
        &or_default("KOLBOARD_MERGE_POLICY", "skip"),
        "KOLBOARD_MERGE_POLICY",
    )?;

    Ok(AppConfig {
        log_level,
        presets_path,
        max_concurrent_profiles,
        tier_table,
        untiered_policy,
        merge_policy,
    })
}

fn parse_selector<T>(raw: &str, var: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = String>,
{
    raw.parse::<T>().map_err(|reason| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
