//! Metrics collection and exposition.
//!
//! # Metrics
//! - `route_table_operations_total` (counter): table operations by `op`, `outcome`
//! - `route_table_routes` (gauge): routes currently stored
//!
//! # Design Decisions
//! - Outcomes are `ok`, `miss` (nothing found) and `invalid` (parse error)
//! - Exporter is optional; without it the macros record nowhere

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one table operation.
pub fn record_operation(op: &'static str, outcome: &'static str) {
    metrics::counter!("route_table_operations_total", "op" => op, "outcome" => outcome)
        .increment(1);
}

/// Publish the current number of stored routes.
pub fn set_route_count(routes: usize) {
    metrics::gauge!("route_table_routes").set(routes as f64);
}
