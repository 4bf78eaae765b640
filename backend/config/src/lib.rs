//! `archivist-config` — Archivist runtime configuration.
//!
//! Provides:
//! - Typed config schema (Discord token, archive credentials, staging, logging)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Resolution into final settings with env-variable fallbacks

pub mod env;
pub mod schema;
pub mod settings;

pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use schema::ArchivistConfig;
pub use settings::{MissingSettingError, Settings};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default config location: `~/.config/archivist/archivist.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("archivist").join("archivist.yaml"))
}

/// Load and env-substitute a config file.
pub fn load_config(path: &Path) -> Result<ArchivistConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let value: serde_json::Value =
        serde_yaml::from_str(&raw).context("Failed to parse config YAML")?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    let config =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;
    Ok(config)
}

/// Load the config file if one exists, otherwise start from an empty
/// config (everything then resolves from environment variables).
pub fn load_or_default(path: Option<&Path>) -> Result<ArchivistConfig> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };
    match path {
        Some(p) => load_config(&p),
        None => Ok(ArchivistConfig::default()),
    }
}
