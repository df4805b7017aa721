//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub gateway_reachable: bool,
}

/// Liveness plus a reachability probe against the record gateway
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let gateway_reachable = state.gateway.ping().await;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        gateway_reachable,
    })
}
