//! Configuration loading from disk and the environment.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the mail account identity.
pub const MAIL_USER_ENV: &str = "MAIL_USER";
/// Environment variable holding the mail app password.
pub const MAIL_PASS_ENV: &str = "MAIL_PASS";
/// Environment variable overriding the listener port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ServerConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides on top of the loaded configuration.
///
/// Secrets never have to live in the config file: `MAIL_USER` and
/// `MAIL_PASS` take precedence over any file values. `PORT` rewrites the
/// port of the listener bind address, keeping the configured host.
pub fn apply_env_overrides(config: &mut ServerConfig) {
    if let Ok(user) = env::var(MAIL_USER_ENV) {
        if !user.is_empty() {
            config.mail.username = Some(user);
        }
    }
    if let Ok(pass) = env::var(MAIL_PASS_ENV) {
        if !pass.is_empty() {
            config.mail.password = Some(pass);
        }
    }
    if let Ok(port) = env::var(PORT_ENV) {
        match port.parse::<u16>() {
            Ok(port) => {
                if let Some((host, _)) = config.listener.bind_address.rsplit_once(':') {
                    config.listener.bind_address = format!("{host}:{port}");
                }
            }
            Err(_) => {
                tracing::warn!(value = %port, "Ignoring non-numeric PORT override");
            }
        }
    }
}
