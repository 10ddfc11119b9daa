//! IPv4 route table with longest-prefix-match lookup, served over HTTP.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod table;

pub use config::TableConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use table::{Ipv4Prefix, Route, RouteTable, RouteTrie, TableError};
