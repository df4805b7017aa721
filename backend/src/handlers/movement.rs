//! Stock movement handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared::StockMovement;

use crate::error::AppResult;
use crate::services::movement::{MovementInput, MovementService};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<StockMovement>>> {
    let service = MovementService::new(state.gateway.clone());
    Ok(Json(service.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<StockMovement>> {
    let service = MovementService::new(state.gateway.clone());
    Ok(Json(service.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<MovementInput>,
) -> AppResult<(StatusCode, Json<StockMovement>)> {
    let service = MovementService::new(state.gateway.clone());
    let movement = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}
