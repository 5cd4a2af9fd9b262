//! Consultation Submission Service Library

pub mod archive;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod mail;
pub mod observability;
pub mod security;
pub mod submission;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
