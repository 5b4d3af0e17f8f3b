// Configuration loader
//
// Precedence, lowest to highest: defaults, ~/.codebreakers/config.toml (or an
// explicit --config file), environment variables, command-line flags.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_LOG_DIR, ENV_SERVER_URL};
use super::settings::Config;

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file. Unlike the default location, it must exist.
    pub config_path: Option<PathBuf>,
    pub server_url: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub bind_address: Option<String>,
}

/// Default config file location (`~/.codebreakers/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from file, environment, and command-line overrides
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = match &overrides.config_path {
        Some(path) => load_from_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_from_file(&path)?,
            _ => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_env(&mut config, |key| std::env::var(key).ok());
    apply_overrides(&mut config, overrides);

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// Parse a TOML config file. Missing keys fall back to defaults.
pub fn load_from_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn apply_env(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(ENV_SERVER_URL).filter(|v| !v.is_empty()) {
        config.server_url = url;
    }
    if let Some(dir) = lookup(ENV_LOG_DIR).filter(|v| !v.is_empty()) {
        config.log_dir = PathBuf::from(dir);
    }
}

fn apply_overrides(config: &mut Config, overrides: &ConfigOverrides) {
    if let Some(url) = &overrides.server_url {
        config.server_url = url.clone();
    }
    if let Some(dir) = &overrides.log_dir {
        config.log_dir = dir.clone();
    }
    if let Some(bind) = &overrides.bind_address {
        config.bind_address = bind.clone();
    }
}
