//! Consultation Submission Service
//!
//! A small HTTP service that receives "book a consultation" form submissions
//! from the marketing site, validates them, rate-limits them per client
//! address, and relays each accepted submission as a plain-text email to the
//! business inbox over SMTP.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │              CONSULTATION SERVICE                │
//!                    │                                                  │
//!   Form POST        │  ┌─────────┐   ┌────────────┐   ┌────────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│ submission │──▶│  security  │  │
//!                    │  │ handler │   │ validation │   │ rate limit │  │
//!                    │  └─────────┘   └────────────┘   └─────┬──────┘  │
//!                    │                                       │         │
//!                    │                                       ▼         │
//!   JSON response    │  ┌─────────┐                   ┌────────────┐   │      SMTP
//!   ◀────────────────┼──│response │◀──────────────────│    mail    │───┼────▶ relay
//!                    │  │ mapping │                   │ dispatcher │   │
//!                    │  └─────────┘                   └────────────┘   │
//!                    │                                                 │
//!                    │  ┌─────────────────────────────────────────────┐│
//!                    │  │           Cross-Cutting Concerns            ││
//!                    │  │  ┌────────┐ ┌─────────────┐ ┌───────────┐  ││
//!                    │  │  │ config │ │observability│ │ lifecycle │  ││
//!                    │  │  └────────┘ └─────────────┘ └───────────┘  ││
//!                    │  └─────────────────────────────────────────────┘│
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use consultation_server::config::loader::{apply_env_overrides, load_config};
use consultation_server::{HttpServer, ServerConfig, Shutdown};

#[derive(Parser, Debug)]
#[command(version, about = "Consultation form submission relay")]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "consultation_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("consultation-server v{} starting", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    apply_env_overrides(&mut config);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mail_configured = config.mail.has_credentials(),
        rate_limit_window_secs = config.rate_limit.window_secs,
        rate_limit_max = config.rate_limit.max_per_window,
        "Configuration loaded"
    );
    if !config.mail.has_credentials() {
        tracing::warn!(
            "MAIL_USER / MAIL_PASS not set; submissions will be rejected until mail is configured"
        );
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Start the Prometheus exporter when enabled
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            consultation_server::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Create and run HTTP server
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
