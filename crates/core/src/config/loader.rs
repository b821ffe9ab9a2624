use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Prefix for environment variable overrides, e.g. `HAULAGE_SERVER_PORT=9000`.
pub const ENV_PREFIX: &str = "HAULAGE_";

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "HAULAGE_CONFIG";

/// Config file used when `HAULAGE_CONFIG` is unset or empty.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Resolve the config file path from the environment.
pub fn config_path() -> PathBuf {
    resolve_config_path(std::env::var(CONFIG_PATH_ENV).ok())
}

fn resolve_config_path(value: Option<String>) -> PathBuf {
    match value {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
