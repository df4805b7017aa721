//! Purchase order handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use shared::{PurchaseOrder, PurchaseOrderFilter, PurchaseOrderItem};

use crate::error::AppResult;
use crate::services::purchase_order::{
    LineItemInput, OrderTotals, PurchaseOrderInput, PurchaseOrderListing, PurchaseOrderService,
};
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PurchaseOrderFilter>,
) -> AppResult<Json<PurchaseOrderListing>> {
    let service = PurchaseOrderService::new(state.gateway.clone());
    Ok(Json(service.list(&filter).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PurchaseOrder>> {
    let service = PurchaseOrderService::new(state.gateway.clone());
    Ok(Json(service.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<PurchaseOrderInput>,
) -> AppResult<(StatusCode, Json<PurchaseOrder>)> {
    let service = PurchaseOrderService::new(state.gateway.clone());
    let order = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<PurchaseOrderInput>,
) -> AppResult<Json<PurchaseOrder>> {
    let service = PurchaseOrderService::new(state.gateway.clone());
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = PurchaseOrderService::new(state.gateway.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn totals(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderTotals>> {
    let service = PurchaseOrderService::new(state.gateway.clone());
    Ok(Json(service.totals(id).await?))
}

pub async fn list_items(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<PurchaseOrderItem>>> {
    let service = PurchaseOrderService::new(state.gateway.clone());
    service.get(id).await?;
    Ok(Json(service.items(id).await?))
}

pub async fn create_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<LineItemInput>,
) -> AppResult<(StatusCode, Json<PurchaseOrderItem>)> {
    let service = PurchaseOrderService::new(state.gateway.clone());
    let item = service.create_item(id, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(i64, i64)>,
    Json(input): Json<LineItemInput>,
) -> AppResult<Json<PurchaseOrderItem>> {
    let service = PurchaseOrderService::new(state.gateway.clone());
    Ok(Json(service.update_item(id, item_id, input).await?))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    let service = PurchaseOrderService::new(state.gateway.clone());
    service.delete_item(id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
