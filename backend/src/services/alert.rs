//! Low-stock alert service
//!
//! The alert email itself is sent by a serverless function hosted next to
//! the record store; this service gathers the low-stock products and hands
//! them over. When nothing is low the function is not invoked at all.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use shared::Product;

use crate::error::AppResult;
use crate::gateway::{tables, Query, RecordGateway};
use crate::normalize::product_from_record;

/// Outcome of an alert send request
#[derive(Debug, Serialize)]
pub struct AlertOutcome {
    pub sent: bool,
    pub low_stock_count: usize,
    pub message: String,
}

/// Service for low-stock alerts
pub struct AlertService {
    gateway: Arc<dyn RecordGateway>,
    function_name: String,
}

impl AlertService {
    pub fn new(gateway: Arc<dyn RecordGateway>, function_name: String) -> Self {
        Self {
            gateway,
            function_name,
        }
    }

    /// Products at or below their minimum-stock threshold, out-of-stock
    /// included. Degrades to empty when the gateway is unreachable.
    pub async fn low_stock(&self) -> AppResult<Vec<Product>> {
        let query = Query::new().fields(&[
            "Name",
            "sku_c",
            "quantity_c",
            "price_c",
            "category_c",
            "min_stock_c",
        ]);
        let records = match self.gateway.fetch_records(tables::PRODUCT, &query).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("low-stock fetch failed, serving empty listing: {}", err);
                Vec::new()
            }
        };
        Ok(records
            .iter()
            .map(product_from_record)
            .filter(|p| p.stock_status().is_low())
            .collect())
    }

    /// Invoke the alert function with the current low-stock products.
    pub async fn send(&self) -> AppResult<AlertOutcome> {
        let products = self.low_stock().await?;
        if products.is_empty() {
            return Ok(AlertOutcome {
                sent: false,
                low_stock_count: 0,
                message: "No low stock items to report".to_string(),
            });
        }

        let payload = json!({
            "products": products
                .iter()
                .map(|p| json!({
                    "id": p.id,
                    "name": p.name,
                    "sku": p.sku,
                    "quantity": p.quantity,
                    "min_stock": p.min_stock,
                }))
                .collect::<Vec<_>>(),
        });

        let result = self
            .gateway
            .invoke_function(&self.function_name, payload)
            .await?;
        tracing::info!(
            "low-stock alert dispatched for {} products: {}",
            products.len(),
            result.message
        );

        Ok(AlertOutcome {
            sent: result.success,
            low_stock_count: products.len(),
            message: result.message,
        })
    }
}
