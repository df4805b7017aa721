//! Low-stock alert handlers

use axum::{extract::State, Json};

use shared::Product;

use crate::error::AppResult;
use crate::services::alert::{AlertOutcome, AlertService};
use crate::AppState;

fn service(state: &AppState) -> AlertService {
    AlertService::new(
        state.gateway.clone(),
        state.config.alerts.low_stock_function.clone(),
    )
}

pub async fn low_stock(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(service(&state).low_stock().await?))
}

pub async fn send(State(state): State<AppState>) -> AppResult<Json<AlertOutcome>> {
    Ok(Json(service(&state).send().await?))
}
