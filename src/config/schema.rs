//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the consultation service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Outbound mail settings and secrets.
    pub mail: MailConfig,

    /// Per-client submission rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Cross-origin resource sharing.
    pub cors: CorsConfig,

    /// Optional flat-file archive of accepted submissions.
    pub archive: ArchiveConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Outbound mail configuration.
///
/// `username` and `password` are usually supplied through the `MAIL_USER`
/// and `MAIL_PASS` environment variables rather than the config file. The
/// credential is expected to be a 16-character app password; the dispatcher
/// enforces that shape before ever opening a connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MailConfig {
    /// SMTP relay hostname.
    pub smtp_host: String,

    /// SMTP relay port (implicit-TLS submission port by default).
    pub smtp_port: u16,

    /// Mail account identity used to authenticate and send from.
    pub username: Option<String>,

    /// App password for the mail account.
    pub password: Option<String>,

    /// Destination inbox for consultation requests.
    pub recipient: String,

    /// Display name on the From header.
    pub sender_name: String,

    /// SMTP operation timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            username: None,
            password: None,
            recipient: String::new(),
            sender_name: "Consultation Form".to_string(),
            timeout_secs: 20,
        }
    }
}

impl MailConfig {
    /// Whether both mail secrets are present and non-empty.
    pub fn has_credentials(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
            && self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Trailing window length in seconds.
    pub window_secs: u64,

    /// Maximum accepted submissions per client within the window.
    pub max_per_window: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 5 * 60,
            max_per_window: 5,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Origin allowed to call the API. Any origin when unset.
    pub allowed_origin: Option<String>,
}

/// Optional archive of accepted submissions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Enable the append-only submission log.
    pub enabled: bool,

    /// Path of the JSON-lines log file.
    pub path: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "messages.jsonl".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Address for the scrape endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}
