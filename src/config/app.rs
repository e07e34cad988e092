//! Application configuration loading from config.toml.
//!
//! Binds the invite-code settings and optional database URL override from a
//! TOML configuration file, with environment variables taking precedence for
//! deployment overrides. The invite-code TTL lives here because the core
//! never computes expiry itself; it only hands the configured duration to
//! the ephemeral store.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default invite-code lifetime when none is configured (10 minutes).
const DEFAULT_INVITE_CODE_TTL_SECS: u64 = 600;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Optional database URL override (environment `DATABASE_URL` wins)
    pub database_url: Option<String>,
    /// Invite-code protocol settings
    #[serde(default)]
    pub invite_code: InviteCodeConfig,
}

/// Invite-code protocol settings
#[derive(Debug, Deserialize, Clone)]
pub struct InviteCodeConfig {
    /// How long an issued code stays redeemable, in seconds
    pub ttl_secs: u64,
}

impl Default for InviteCodeConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_INVITE_CODE_TTL_SECS,
        }
    }
}

impl InviteCodeConfig {
    /// The configured code lifetime as a [`Duration`].
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Loads application configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads application configuration from the default location (./config.toml),
/// falling back to defaults when the file is absent.
pub fn load_default_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    if Path::new("config.toml").exists() {
        load_config("config.toml")
    } else {
        Ok(AppConfig {
            database_url: None,
            invite_code: InviteCodeConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_app_config() {
        let toml_str = r#"
            database_url = "sqlite://data/test.sqlite"

            [invite_code]
            ttl_secs = 300
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("sqlite://data/test.sqlite")
        );
        assert_eq!(config.invite_code.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_invite_code_defaults_when_absent() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.invite_code.ttl(), Duration::from_secs(600));
    }
}
