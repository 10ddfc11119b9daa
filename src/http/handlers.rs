//! Route table endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::table::{Ipv4Prefix, Route};

/// Body of `POST /routes`.
#[derive(Debug, Deserialize)]
pub struct CreateRoute {
    pub prefix: String,
    pub next_hop: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub ip: String,
    pub match_prefix: Ipv4Prefix,
    pub next_hop: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub prefix: String,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub routes: usize,
}

pub async fn add_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRoute>,
) -> Result<(StatusCode, Json<Route>), ApiError> {
    let route = state.write().insert(&request.prefix, &request.next_hop)?;
    tracing::info!(prefix = %route.prefix, next_hop = %route.next_hop, "Route stored");
    Ok((StatusCode::CREATED, Json(route)))
}

pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<Route>> {
    let routes = state.read().list();
    Json(routes)
}

pub async fn lookup(
    State(state): State<AppState>,
    Path(ip): Path<String>,
) -> Result<Json<LookupResponse>, ApiError> {
    let route = state
        .read()
        .lookup(&ip)?
        .ok_or(ApiError::NotFound("No matching route found"))?;

    Ok(Json(LookupResponse {
        ip,
        match_prefix: route.prefix,
        next_hop: route.next_hop,
    }))
}

pub async fn delete_route(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.write().delete(&prefix)? {
        return Err(ApiError::NotFound("Route not found"));
    }
    tracing::info!(prefix = %prefix, "Route removed");
    Ok(Json(DeleteResponse {
        deleted: true,
        prefix,
    }))
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let routes = state.read().len();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        routes,
    })
}
