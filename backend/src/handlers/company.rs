//! Company handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared::Company;

use crate::error::AppResult;
use crate::services::company::{CompanyInput, CompanyService};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Company>>> {
    let service = CompanyService::new(state.gateway.clone());
    Ok(Json(service.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Company>> {
    let service = CompanyService::new(state.gateway.clone());
    Ok(Json(service.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CompanyInput>,
) -> AppResult<(StatusCode, Json<Company>)> {
    let service = CompanyService::new(state.gateway.clone());
    let company = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CompanyInput>,
) -> AppResult<Json<Company>> {
    let service = CompanyService::new(state.gateway.clone());
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = CompanyService::new(state.gateway.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
