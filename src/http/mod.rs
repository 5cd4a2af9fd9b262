//! HTTP surface of the consultation service.
//!
//! # Data Flow
//! ```text
//! POST /api/consultation
//!     → server.rs (Axum setup, middleware: trace, CORS, body limit, timeout)
//!     → handlers.rs (decode body, identify client)
//!     → submission validation → rate limit → mail dispatch → archive
//!     → error.rs (outcome → status code + JSON envelope)
//!
//! GET /health
//!     → handlers.rs (liveness + mail credential presence, no side effects)
//! ```

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ApiResponse};
pub use server::{AppState, HttpServer};
