//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define router metrics (matches, misses, latency, reloads)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `router_matches_total` (counter): successful matches by route pattern
//! - `router_no_match_total` (counter): lookups that found nothing
//! - `router_match_duration_seconds` (histogram): lookup latency
//! - `router_reloads_total` (counter): tree rebuilds by outcome
//! - `router_routes` (gauge): routes in the published tree
//!
//! # Design Decisions
//! - Recorders are no-ops until an exporter is installed
//! - Route label is the canonical pattern, which keeps cardinality bounded

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_match(pattern: &str, start: Instant) {
    ::metrics::counter!("router_matches_total", "route" => pattern.to_string()).increment(1);
    ::metrics::histogram!("router_match_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_no_match(start: Instant) {
    ::metrics::counter!("router_no_match_total").increment(1);
    ::metrics::histogram!("router_match_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_reload(success: bool, routes: usize) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!("router_reloads_total", "outcome" => outcome).increment(1);
    record_routes(routes);
}

pub fn record_routes(routes: usize) {
    ::metrics::gauge!("router_routes").set(routes as f64);
}
