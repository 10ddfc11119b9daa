//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Own the shared route table and serialize access to it
//! - Bind server to listener and stop on shutdown
//!
//! # Design Decisions
//! - One `RwLock` around the whole table: writers are exclusive for one
//!   operation, lookups and listings share the read side
//! - A poisoned lock is recovered; table operations never leave the trie
//!   half-updated

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use axum::{
    routing::{delete, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::TableConfig;
use crate::http::handlers::{add_route, delete_route, get_status, list_routes, lookup};
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::table::RouteTable;

/// Application state injected into handlers.
#[derive(Clone, Default)]
pub struct AppState {
    table: Arc<RwLock<RouteTable>>,
}

impl AppState {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table: Arc::new(RwLock::new(table)),
        }
    }

    /// Shared access for lookups and listings.
    pub fn read(&self) -> RwLockReadGuard<'_, RouteTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access for inserts and deletes.
    pub fn write(&self) -> RwLockWriteGuard<'_, RouteTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// HTTP server fronting the route table.
pub struct HttpServer {
    router: Router,
    state: AppState,
    config: TableConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `table`.
    pub fn new(config: TableConfig, table: RouteTable) -> Self {
        let state = AppState::new(table);
        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            state,
            config,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &TableConfig, state: AppState) -> Router {
        Router::new()
            .route("/routes", get(list_routes).post(add_route))
            .route("/routes/{*prefix}", delete(delete_route))
            .route("/lookup/{ip}", get(lookup))
            .route("/status", get(get_status))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.state.read().len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Handle to the shared table.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }
}
