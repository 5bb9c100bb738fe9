//! Server configuration
//!
//! Loaded from an optional `gftp-server.toml` with `GFTP_SERVER_*`
//! environment overrides on top of built-in defaults.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address the listener binds to.
    pub bind_address: String,
    pub port: u16,

    /// Directory uploads are stored in and downloads are served from.
    pub server_root: String,

    /// The single account accepted by USER/PASS.
    pub username: String,
    pub password: String,

    /// Maximum concurrent connections.
    pub max_clients: usize,

    /// Silence after which an upload body is considered complete.
    pub upload_idle_timeout_ms: u64,

    /// Read buffer size for upload bodies.
    pub buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 2121,
            server_root: "./server_root".to_string(),
            username: "gftp".to_string(),
            password: "gftp".to_string(),
            max_clients: 10,
            upload_idle_timeout_ms: 1000,
            buffer_size: 8192,
        }
    }
}

impl ServerConfig {
    /// Load configuration with defaults, optional file, then environment.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();
        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("server_root", defaults.server_root)?
            .set_default("username", defaults.username)?
            .set_default("password", defaults.password)?
            .set_default("max_clients", defaults.max_clients as i64)?
            .set_default("upload_idle_timeout_ms", defaults.upload_idle_timeout_ms as i64)?
            .set_default("buffer_size", defaults.buffer_size as i64)?
            .add_source(File::with_name("gftp-server").required(false))
            .add_source(Environment::with_prefix("GFTP_SERVER"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_root.is_empty() {
            return Err(ConfigError::Message("server_root cannot be empty".into()));
        }

        if self.username.is_empty() {
            return Err(ConfigError::Message("username cannot be empty".into()));
        }

        if self.max_clients == 0 {
            return Err(ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.upload_idle_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "upload_idle_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.buffer_size == 0 {
            return Err(ConfigError::Message(
                "buffer_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Bind address and port as a socket address string.
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    pub fn upload_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.upload_idle_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.control_socket(), "127.0.0.1:2121");
        assert_eq!(config.upload_idle_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = ServerConfig {
            max_clients: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            upload_idle_timeout_ms: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            server_root: String::new(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
