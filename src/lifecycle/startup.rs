//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the route table from the static routes in config
//!
//! # Design Decisions
//! - Fail fast: a static route that does not parse aborts startup
//! - Static routes are inserted in file order, later duplicates overwrite

use crate::config::TableConfig;
use crate::table::{RouteTable, TableError};

/// Create a table holding every static route from `config`.
pub fn build_table(config: &TableConfig) -> Result<RouteTable, TableError> {
    let mut table = RouteTable::new();
    for route in &config.routes {
        let stored = table.insert(&route.prefix, &route.next_hop)?;
        tracing::info!(
            prefix = %stored.prefix,
            next_hop = %stored.next_hop,
            "Static route installed"
        );
    }
    Ok(table)
}
