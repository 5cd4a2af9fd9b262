//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: MAIL_USER, MAIL_PASS, PORT)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared with all subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults so the service runs with no config file
//! - Mail secrets come from the environment and are only checked for
//!   presence at startup; a missing credential is a dispatch-time error,
//!   not a startup crash

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::CorsConfig;
pub use schema::ListenerConfig;
pub use schema::MailConfig;
pub use schema::RateLimitConfig;
pub use schema::ServerConfig;
