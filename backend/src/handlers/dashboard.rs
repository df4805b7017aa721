//! Dashboard handlers

use axum::{extract::State, Json};

use shared::{DashboardStats, RecentMovement};

use crate::error::AppResult;
use crate::services::dashboard::DashboardService;
use crate::AppState;

pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let service = DashboardService::new(state.gateway.clone());
    Ok(Json(service.stats().await?))
}

pub async fn recent_movements(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RecentMovement>>> {
    let service = DashboardService::new(state.gateway.clone());
    let limit = state.config.dashboard.recent_movement_limit;
    Ok(Json(service.recent_movements(limit).await?))
}
