//! Metrics collection and exposition.
//!
//! # Metrics
//! - `consultation_submissions_total` (counter): submissions by outcome
//!   (`accepted`, `invalid`, `bad_request`, `config_error`, `mail_error`)
//! - `consultation_rate_limited_total` (counter): rejected by the limiter

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Install failure is logged, not fatal: the service keeps running
/// without a scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Count one submission by pipeline outcome.
pub fn record_submission(outcome: &'static str) {
    metrics::counter!("consultation_submissions_total", "outcome" => outcome).increment(1);
}

/// Count one rejection by the rate limiter.
pub fn record_rate_limited() {
    metrics::counter!("consultation_rate_limited_total").increment(1);
}
