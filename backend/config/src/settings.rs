//! Fully-resolved runtime settings.
//!
//! Each value resolves config-file first, then a dedicated environment
//! variable, then a default; required values missing from both sources
//! are an error naming where to put them.

use crate::schema::ArchivistConfig;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("missing required setting `{path}` (set it in the config file or the {env} environment variable)")]
pub struct MissingSettingError {
    pub path: &'static str,
    pub env: &'static str,
}

/// Everything the composition root needs to start the bot.
#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub archive_access_key: String,
    pub archive_secret_key: String,
    pub archive_endpoint: Option<String>,
    pub staging_dir: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Settings {
    /// Resolve against the process environment.
    pub fn resolve(config: &ArchivistConfig) -> Result<Self, MissingSettingError> {
        Self::resolve_with(config, &std::env::vars().collect())
    }

    /// Resolve against a provided env map (useful for testing).
    pub fn resolve_with(
        config: &ArchivistConfig,
        env: &HashMap<String, String>,
    ) -> Result<Self, MissingSettingError> {
        let lookup = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

        Ok(Self {
            discord_token: require(
                config.discord.as_ref().and_then(|d| d.token.clone()),
                lookup("DISCORD_BOT_TOKEN"),
                "discord.token",
                "DISCORD_BOT_TOKEN",
            )?,
            archive_access_key: require(
                config.archive.as_ref().and_then(|a| a.access_key.clone()),
                lookup("IA_ACCESS_KEY"),
                "archive.accessKey",
                "IA_ACCESS_KEY",
            )?,
            archive_secret_key: require(
                config.archive.as_ref().and_then(|a| a.secret_key.clone()),
                lookup("IA_SECRET_KEY"),
                "archive.secretKey",
                "IA_SECRET_KEY",
            )?,
            archive_endpoint: config.archive.as_ref().and_then(|a| a.endpoint.clone()),
            staging_dir: config
                .staging
                .as_ref()
                .and_then(|s| s.dir.clone())
                .or_else(|| lookup("ARCHIVIST_STAGING_DIR"))
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            log_level: config
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
            log_dir: config
                .logging
                .as_ref()
                .and_then(|l| l.dir.clone())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
        })
    }
}

fn require(
    configured: Option<String>,
    from_env: Option<String>,
    path: &'static str,
    env: &'static str,
) -> Result<String, MissingSettingError> {
    configured
        .filter(|v| !v.is_empty())
        .or(from_env)
        .ok_or(MissingSettingError { path, env })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ArchiveConfig, DiscordConfig};

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            ("DISCORD_BOT_TOKEN", "tok"),
            ("IA_ACCESS_KEY", "ak"),
            ("IA_SECRET_KEY", "sk"),
        ])
    }

    #[test]
    fn resolves_everything_from_env_when_config_is_empty() {
        let settings =
            Settings::resolve_with(&ArchivistConfig::default(), &full_env()).unwrap();
        assert_eq!(settings.discord_token, "tok");
        assert_eq!(settings.archive_access_key, "ak");
        assert_eq!(settings.archive_secret_key, "sk");
        assert!(settings.archive_endpoint.is_none());
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn config_file_values_win_over_env() {
        let config = ArchivistConfig {
            discord: Some(DiscordConfig {
                token: Some("from-file".into()),
            }),
            ..Default::default()
        };
        let settings = Settings::resolve_with(&config, &full_env()).unwrap();
        assert_eq!(settings.discord_token, "from-file");
    }

    #[test]
    fn missing_required_value_names_both_sources() {
        let err = Settings::resolve_with(
            &ArchivistConfig::default(),
            &env(&[("DISCORD_BOT_TOKEN", "tok"), ("IA_ACCESS_KEY", "ak")]),
        )
        .unwrap_err();
        assert_eq!(err.path, "archive.secretKey");
        assert!(err.to_string().contains("IA_SECRET_KEY"));
    }

    #[test]
    fn endpoint_comes_only_from_config() {
        let config = ArchivistConfig {
            archive: Some(ArchiveConfig {
                access_key: Some("a".into()),
                secret_key: Some("s".into()),
                endpoint: Some("http://localhost:9000".into()),
            }),
            ..Default::default()
        };
        let settings =
            Settings::resolve_with(&config, &env(&[("DISCORD_BOT_TOKEN", "tok")])).unwrap();
        assert_eq!(settings.archive_endpoint.unwrap(), "http://localhost:9000");
    }
}
