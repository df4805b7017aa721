//! Supplier handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared::Supplier;

use crate::error::AppResult;
use crate::services::supplier::{SupplierInput, SupplierService};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.gateway.clone());
    Ok(Json(service.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.gateway.clone());
    Ok(Json(service.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<SupplierInput>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let service = SupplierService::new(state.gateway.clone());
    let supplier = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.gateway.clone());
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = SupplierService::new(state.gateway.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
