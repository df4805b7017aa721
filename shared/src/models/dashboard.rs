//! Dashboard aggregates
//!
//! Pure reductions over fully-loaded collections, recomputed on every load.
//! There is deliberately no incremental maintenance: a full re-scan cannot
//! drift from its source.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Category, Product, StockMovement};

/// Headline metrics for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_products: usize,
    pub low_stock_items: usize,
    pub total_categories: usize,
    pub inventory_value: Decimal,
}

impl DashboardStats {
    pub fn compute(products: &[Product], categories: &[Category]) -> Self {
        Self {
            total_products: products.len(),
            low_stock_items: products
                .iter()
                .filter(|p| p.stock_status().is_low())
                .count(),
            total_categories: categories.len(),
            inventory_value: products.iter().map(|p| p.stock_value()).sum(),
        }
    }
}

/// A stock movement annotated with its product's display name
#[derive(Debug, Clone, Serialize)]
pub struct RecentMovement {
    #[serde(flatten)]
    pub movement: StockMovement,
    pub product_name: String,
}

/// Label used when a movement's product reference cannot be resolved
/// against the loaded product collection.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Most recent movements, newest first, truncated to `limit`, each
/// annotated with the owning product's name. Unresolved references degrade
/// to [`UNKNOWN_PRODUCT`] instead of failing.
pub fn recent_movements(
    movements: &[StockMovement],
    products: &[Product],
    limit: usize,
) -> Vec<RecentMovement> {
    let mut sorted: Vec<&StockMovement> = movements.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
        .into_iter()
        .take(limit)
        .map(|movement| RecentMovement {
            movement: movement.clone(),
            product_name: products
                .iter()
                .find(|p| p.id == movement.product_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
        })
        .collect()
}
