//! Dashboard service
//!
//! Aggregates are recomputed from full collections on every request; the
//! heavy lifting lives in the shared crate so it stays pure and testable.

use std::sync::Arc;

use shared::{recent_movements, Category, DashboardStats, Product, RecentMovement, StockMovement};

use crate::error::AppResult;
use crate::gateway::{tables, Query, RecordGateway};
use crate::normalize::{category_from_record, movement_from_record, product_from_record};

/// Service for dashboard aggregates
pub struct DashboardService {
    gateway: Arc<dyn RecordGateway>,
}

impl DashboardService {
    pub fn new(gateway: Arc<dyn RecordGateway>) -> Self {
        Self { gateway }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let products = self.products().await;
        let categories = self.categories().await;
        Ok(DashboardStats::compute(&products, &categories))
    }

    /// Most recent movements annotated with product names
    pub async fn recent_movements(&self, limit: usize) -> AppResult<Vec<RecentMovement>> {
        let movements = self.movements().await;
        let products = self.products().await;
        Ok(recent_movements(&movements, &products, limit))
    }

    async fn products(&self) -> Vec<Product> {
        let query = Query::new().fields(&[
            "Name",
            "sku_c",
            "quantity_c",
            "price_c",
            "min_stock_c",
        ]);
        match self.gateway.fetch_records(tables::PRODUCT, &query).await {
            Ok(records) => records.iter().map(product_from_record).collect(),
            Err(err) => {
                tracing::warn!("dashboard product fetch failed: {}", err);
                Vec::new()
            }
        }
    }

    async fn categories(&self) -> Vec<Category> {
        let query = Query::new().fields(&["Name"]);
        match self.gateway.fetch_records(tables::CATEGORY, &query).await {
            Ok(records) => records.iter().map(category_from_record).collect(),
            Err(err) => {
                tracing::warn!("dashboard category fetch failed: {}", err);
                Vec::new()
            }
        }
    }

    async fn movements(&self) -> Vec<StockMovement> {
        let query = Query::new()
            .fields(&["product_c", "direction_c", "quantity_c", "note_c", "timestamp_c"])
            .order_by_desc("timestamp_c");
        match self
            .gateway
            .fetch_records(tables::STOCK_MOVEMENT, &query)
            .await
        {
            Ok(records) => records.iter().map(movement_from_record).collect(),
            Err(err) => {
                tracing::warn!("dashboard movement fetch failed: {}", err);
                Vec::new()
            }
        }
    }
}
