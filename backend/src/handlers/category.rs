//! Category handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared::Category;

use crate::error::AppResult;
use crate::services::category::{CategoryInput, CategoryNode, CategoryService};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let service = CategoryService::new(state.gateway.clone());
    Ok(Json(service.list().await?))
}

pub async fn tree(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryNode>>> {
    let service = CategoryService::new(state.gateway.clone());
    Ok(Json(service.tree().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.gateway.clone());
    Ok(Json(service.get(id).await?))
}

pub async fn assignable_parents(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Category>>> {
    let service = CategoryService::new(state.gateway.clone());
    Ok(Json(service.assignable_parents(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let service = CategoryService::new(state.gateway.clone());
    let category = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.gateway.clone());
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = CategoryService::new(state.gateway.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
