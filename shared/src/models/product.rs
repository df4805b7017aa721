//! Product model and stock-status classification

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as shown in the console, with its category reference already
/// resolved to a display name by the entity normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub price: Decimal,
    pub category: String,
    pub min_stock: i64,
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn stock_status(&self) -> StockStatus {
        classify_stock(self.quantity, self.min_stock)
    }

    /// Quantity × price contribution of this product to the inventory value.
    pub fn stock_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Stock level classification relative to the minimum-stock threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Nothing on hand
    OutOfStock,
    /// At or below the minimum-stock threshold
    Low,
    /// Between the threshold and twice the threshold
    Medium,
    /// Above twice the threshold
    Good,
}

impl StockStatus {
    /// The coarse "needs attention" bucket used by the dashboard and the
    /// alert views: out-of-stock counts as low.
    pub fn is_low(&self) -> bool {
        matches!(self, StockStatus::OutOfStock | StockStatus::Low)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::OutOfStock => write!(f, "Out of Stock"),
            StockStatus::Low => write!(f, "Low"),
            StockStatus::Medium => write!(f, "Medium"),
            StockStatus::Good => write!(f, "Good"),
        }
    }
}

/// Classify stock level against the minimum-stock threshold.
///
/// A `min_stock` of zero collapses the Medium band to zero width, so any
/// positive quantity classifies as Good. The bands are threshold
/// comparisons only; nothing here divides.
pub fn classify_stock(quantity: i64, min_stock: i64) -> StockStatus {
    if quantity == 0 {
        StockStatus::OutOfStock
    } else if quantity <= min_stock {
        StockStatus::Low
    } else if min_stock > 0 && quantity <= min_stock * 2 {
        StockStatus::Medium
    } else {
        StockStatus::Good
    }
}
