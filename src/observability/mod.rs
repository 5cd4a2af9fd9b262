//! Observability subsystem.
//!
//! Structured logging goes through `tracing`; the subscriber is installed
//! in `main`. This module owns the metrics side: counters for submission
//! outcomes, exposed through an optional Prometheus scrape endpoint.

pub mod metrics;
