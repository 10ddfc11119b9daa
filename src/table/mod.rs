//! Route table subsystem.
//!
//! # Data Flow
//! ```text
//! "10.0.0.0/8", "A"  → prefix.rs (parse CIDR, mask host bits)
//!                    → trie.rs   (walk/create one node per prefix bit)
//!
//! "10.1.2.3"         → prefix.rs (parse dotted quad)
//!                    → trie.rs   (walk address bits, keep deepest route)
//!                    → Some(Route) or None
//! ```
//!
//! # Design Decisions
//! - Parsing errors are the only errors; "not found" is `None` / `false`
//! - Listing is computed from the trie, there is no side index to keep in sync
//! - Listing order is lexicographic on the canonical text, not numeric
//! - No internal locking: callers serialize mutations (see `http::server`)

pub mod error;
pub mod prefix;
pub mod trie;

pub use error::TableError;
pub use prefix::{parse_address, Ipv4Prefix};
pub use trie::{Route, RouteTrie};

use crate::observability::metrics;

/// Text-level facade over [`RouteTrie`].
#[derive(Debug, Default)]
pub struct RouteTable {
    trie: RouteTrie,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a route, returning the route as stored.
    pub fn insert(&mut self, prefix: &str, next_hop: &str) -> Result<Route, TableError> {
        let prefix = prefix.parse::<Ipv4Prefix>().inspect_err(|_| {
            metrics::record_operation("insert", "invalid");
        })?;

        let previous = self.trie.insert(prefix, next_hop);
        match &previous {
            Some(old) => tracing::debug!(
                prefix = %prefix,
                next_hop,
                previous = %old.next_hop,
                "Route updated"
            ),
            None => tracing::debug!(prefix = %prefix, next_hop, "Route added"),
        }
        metrics::record_operation("insert", "ok");
        metrics::set_route_count(self.trie.len());

        Ok(Route {
            prefix,
            next_hop: next_hop.to_string(),
        })
    }

    /// Resolve `ip` to its longest matching route.
    pub fn lookup(&self, ip: &str) -> Result<Option<Route>, TableError> {
        let addr = parse_address(ip).inspect_err(|_| {
            metrics::record_operation("lookup", "invalid");
        })?;

        let hit = self.trie.longest_match(addr).cloned();
        match &hit {
            Some(route) => {
                tracing::debug!(ip = %addr, prefix = %route.prefix, "Lookup matched");
                metrics::record_operation("lookup", "ok");
            }
            None => {
                tracing::debug!(ip = %addr, "Lookup found no route");
                metrics::record_operation("lookup", "miss");
            }
        }
        Ok(hit)
    }

    /// Delete the route stored at exactly `prefix`.
    ///
    /// Returns `false` if no route was stored there.
    pub fn delete(&mut self, prefix: &str) -> Result<bool, TableError> {
        let prefix = prefix.parse::<Ipv4Prefix>().inspect_err(|_| {
            metrics::record_operation("delete", "invalid");
        })?;

        match self.trie.remove(&prefix) {
            Some(route) => {
                tracing::debug!(prefix = %prefix, next_hop = %route.next_hop, "Route deleted");
                metrics::record_operation("delete", "ok");
                metrics::set_route_count(self.trie.len());
                Ok(true)
            }
            None => {
                metrics::record_operation("delete", "miss");
                Ok(false)
            }
        }
    }

    /// All routes, ordered by canonical prefix text.
    pub fn list(&self) -> Vec<Route> {
        self.trie.routes().into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Underlying trie, for structural inspection.
    pub fn trie(&self) -> &RouteTrie {
        &self.trie
    }
}
