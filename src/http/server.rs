//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the API and health handlers
//! - Wire up middleware (tracing, CORS, body limit, timeout)
//! - Construct shared state (rate limiter, mail dispatcher, archive)
//! - Serve until shutdown with graceful drain

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::archive::SubmissionArchive;
use crate::config::{CorsConfig, ServerConfig};
use crate::http::handlers;
use crate::lifecycle::signals;
use crate::mail::{MailTransport, SmtpMailer};
use crate::security::RateLimiter;

/// A consultation form fits comfortably in a few hundred bytes.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub mailer: Arc<dyn MailTransport>,
    pub archive: Option<Arc<SubmissionArchive>>,
    pub mail_configured: bool,
}

/// HTTP server for the consultation API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server dispatching through the SMTP relay.
    pub fn new(config: ServerConfig) -> Self {
        let mailer = Arc::new(SmtpMailer::new(config.mail.clone()));
        Self::with_transport(config, mailer)
    }

    /// Create a server with a caller-supplied transport. Tests use this
    /// to observe dispatches without a relay.
    pub fn with_transport(config: ServerConfig, mailer: Arc<dyn MailTransport>) -> Self {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        let archive = config
            .archive
            .enabled
            .then(|| Arc::new(SubmissionArchive::new(&config.archive.path)));

        let state = AppState {
            limiter,
            mailer,
            archive,
            mail_configured: config.mail.has_credentials(),
        };

        Self {
            router: Self::build_router(&config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route(
                "/api/consultation",
                post(handlers::submit_consultation).fallback(handlers::method_not_allowed),
            )
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(cors_layer(&config.cors))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => {}
                    () = signals::shutdown_signal() => {}
                }
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Allow the configured site origin, or any origin when none is pinned.
///
/// Preflight OPTIONS requests are answered by this layer before any
/// method or body processing.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match config.allowed_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            tracing::warn!("Ignoring unparseable cors.allowed_origin; allowing any origin");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
