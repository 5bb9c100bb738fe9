//! Client configuration
//!
//! Optional settings read from `gftp.toml` and `GFTP_*` environment
//! variables. Every key may be absent.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::transfer::{operator_identity, resolve_download_dir};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClientConfig {
    /// Overrides the identity-derived download directory.
    /// Environment: GFTP_DOWNLOAD_DIR
    pub download_dir: Option<String>,

    /// Caps the authentication exchange; unbounded when absent.
    /// Environment: GFTP_MAX_AUTH_ATTEMPTS
    pub max_auth_attempts: Option<u32>,
}

/// Settings a session runs with, resolved from `ClientConfig`.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub download_dir: PathBuf,
    pub max_auth_attempts: Option<u32>,
}

impl ClientConfig {
    /// Load `gftp.toml` from the working directory, if present, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("gftp").required(false))
            .add_source(Environment::with_prefix("GFTP"))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_auth_attempts == Some(0) {
            return Err(ConfigError::Message(
                "max_auth_attempts must be greater than 0".into(),
            ));
        }

        if matches!(&self.download_dir, Some(dir) if dir.trim().is_empty()) {
            return Err(ConfigError::Message("download_dir cannot be empty".into()));
        }

        Ok(())
    }

    /// The configured directory, or `/home/<user>/GFTP` for the current operator.
    pub fn download_dir(&self) -> PathBuf {
        match &self.download_dir {
            Some(dir) => PathBuf::from(dir),
            None => resolve_download_dir(operator_identity().as_deref()),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            download_dir: self.download_dir(),
            max_auth_attempts: self.max_auth_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_dir_override() {
        let config = ClientConfig {
            download_dir: Some("/srv/downloads".into()),
            max_auth_attempts: None,
        };
        assert_eq!(config.download_dir(), PathBuf::from("/srv/downloads"));
    }

    #[test]
    fn test_default_download_dir_is_under_home() {
        let dir = ClientConfig::default().download_dir();
        assert!(dir.starts_with("/home"));
        assert!(dir.ends_with("GFTP"));
    }

    #[test]
    fn test_validate() {
        let mut config = ClientConfig::default();
        assert!(config.validate().is_ok());

        config.max_auth_attempts = Some(0);
        assert!(config.validate().is_err());

        config.max_auth_attempts = Some(3);
        config.download_dir = Some("  ".into());
        assert!(config.validate().is_err());
    }
}
