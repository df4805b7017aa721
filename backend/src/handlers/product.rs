//! Product handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use shared::{Product, ProductFilter};

use crate::error::AppResult;
use crate::services::product::{
    AdjustStockInput, ProductInput, ProductListing, ProductService, StockAdjustment,
};
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<ProductListing>> {
    let service = ProductService::new(state.gateway.clone());
    Ok(Json(service.list(&filter).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.gateway.clone());
    Ok(Json(service.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let service = ProductService::new(state.gateway.clone());
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.gateway.clone());
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = ProductService::new(state.gateway.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<StockAdjustment>> {
    let service = ProductService::new(state.gateway.clone());
    Ok(Json(service.adjust_stock(id, input).await?))
}
