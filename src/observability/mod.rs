//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! table, http, lifecycle produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (operation counters, route gauge)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (when enabled)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every HTTP span
//! - Metric macros are no-ops until a recorder is installed, so the table
//!   can record unconditionally

pub mod logging;
pub mod metrics;
