//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (window and timeouts > 0, addresses parse)
//! - Catch configurations that would only fail at dispatch time
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Mail secrets are deliberately NOT required here; their absence is
//!   reported per-request by the dispatcher

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    BadBindAddress(String),

    #[error("rate_limit.window_secs must be greater than zero")]
    ZeroRateWindow,

    #[error("rate_limit.max_per_window must be greater than zero")]
    ZeroRateLimit,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("mail.smtp_host must not be empty")]
    EmptySmtpHost,

    #[error("mail.smtp_port must be greater than zero")]
    ZeroSmtpPort,

    #[error("mail.timeout_secs must be greater than zero")]
    ZeroMailTimeout,

    #[error("mail.recipient must be set when mail credentials are configured")]
    MissingRecipient,

    #[error("archive.path must not be empty when the archive is enabled")]
    EmptyArchivePath,

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    BadMetricsAddress(String),
}

/// Check a configuration for semantic problems, collecting every error.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError::ZeroRateWindow);
    }
    if config.rate_limit.max_per_window == 0 {
        errors.push(ValidationError::ZeroRateLimit);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.mail.smtp_host.trim().is_empty() {
        errors.push(ValidationError::EmptySmtpHost);
    }
    if config.mail.smtp_port == 0 {
        errors.push(ValidationError::ZeroSmtpPort);
    }
    if config.mail.timeout_secs == 0 {
        errors.push(ValidationError::ZeroMailTimeout);
    }
    if config.mail.has_credentials() && config.mail.recipient.trim().is_empty() {
        errors.push(ValidationError::MissingRecipient);
    }

    if config.archive.enabled && config.archive.path.trim().is_empty() {
        errors.push(ValidationError::EmptyArchivePath);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.rate_limit.window_secs = 0;
        config.rate_limit.max_per_window = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroRateWindow));
        assert!(errors.contains(&ValidationError::ZeroRateLimit));
    }

    #[test]
    fn recipient_required_only_with_credentials() {
        let mut config = ServerConfig::default();
        config.mail.username = Some("sender@example.com".to_string());
        config.mail.password = Some("abcdabcdabcdabcd".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingRecipient]);

        config.mail.recipient = "inbox@example.com".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
