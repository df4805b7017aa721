//! Filter engine for in-memory collections
//!
//! Each filter is a set of independent criteria; a criterion is inactive
//! (always true) when its value is blank after trimming. Active criteria
//! are ANDed. Filters never sort and never mutate the source collection;
//! ordering stays with the gateway query or insertion order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{classify_stock, Product, PurchaseOrder, StockStatus};

/// Stock-level buckets selectable in the product filter panel.
///
/// `Low` is the coarse bucket (quantity at or below the threshold), so it
/// includes out-of-stock; `Out` isolates the zero-quantity subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevelBucket {
    Low,
    Medium,
    Good,
    Out,
}

impl StockLevelBucket {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(StockLevelBucket::Low),
            "medium" => Some(StockLevelBucket::Medium),
            "good" => Some(StockLevelBucket::Good),
            "out" => Some(StockLevelBucket::Out),
            _ => None,
        }
    }

    pub fn matches(&self, quantity: i64, min_stock: i64) -> bool {
        match self {
            StockLevelBucket::Low => quantity <= min_stock,
            StockLevelBucket::Medium => {
                classify_stock(quantity, min_stock) == StockStatus::Medium
            }
            StockLevelBucket::Good => classify_stock(quantity, min_stock) == StockStatus::Good,
            StockLevelBucket::Out => quantity == 0,
        }
    }
}

/// Criteria for filtering the product collection. Values arrive as the raw
/// form strings; parsing happens at evaluation time so a malformed numeric
/// bound degrades to "no constraint" on that one dimension only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock_level: String,
    #[serde(default)]
    pub min_price: String,
    #[serde(default)]
    pub max_price: String,
    #[serde(default)]
    pub min_quantity: String,
    #[serde(default)]
    pub max_quantity: String,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = inactive(&self.search) || {
            let needle = self.search.trim().to_lowercase();
            product.name.to_lowercase().contains(&needle)
                || product.sku.to_lowercase().contains(&needle)
        };

        let matches_category =
            inactive(&self.category) || product.category == self.category.trim();

        let matches_stock_level = match active_str(&self.stock_level) {
            Some(value) => match StockLevelBucket::parse(value) {
                Some(bucket) => bucket.matches(product.quantity, product.min_stock),
                // Unrecognized bucket degrades to no constraint
                None => true,
            },
            None => true,
        };

        let matches_min_price = match parse_decimal(&self.min_price) {
            Some(min) => product.price >= min,
            None => true,
        };
        let matches_max_price = match parse_decimal(&self.max_price) {
            Some(max) => product.price <= max,
            None => true,
        };

        let matches_min_quantity = match parse_int(&self.min_quantity) {
            Some(min) => product.quantity >= min,
            None => true,
        };
        let matches_max_quantity = match parse_int(&self.max_quantity) {
            Some(max) => product.quantity <= max,
            None => true,
        };

        matches_search
            && matches_category
            && matches_stock_level
            && matches_min_price
            && matches_max_price
            && matches_min_quantity
            && matches_max_quantity
    }

    /// Subset of `products` satisfying every active criterion.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }

    /// Number of non-blank criteria. Used for the UI badge only.
    pub fn active_count(&self) -> usize {
        [
            &self.search,
            &self.category,
            &self.stock_level,
            &self.min_price,
            &self.max_price,
            &self.min_quantity,
            &self.max_quantity,
        ]
        .iter()
        .filter(|v| !inactive(v))
        .count()
    }
}

/// Criteria for filtering purchase orders
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseOrderFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: String,
}

impl PurchaseOrderFilter {
    pub fn matches(&self, order: &PurchaseOrder) -> bool {
        let matches_search = inactive(&self.search) || {
            let needle = self.search.trim().to_lowercase();
            order.name.to_lowercase().contains(&needle)
                || order.number.to_lowercase().contains(&needle)
                || order.supplier_name.to_lowercase().contains(&needle)
        };

        let matches_status =
            inactive(&self.status) || order.status.as_str() == self.status.trim();

        matches_search && matches_status
    }

    pub fn apply<'a>(&self, orders: &'a [PurchaseOrder]) -> Vec<&'a PurchaseOrder> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }

    pub fn active_count(&self) -> usize {
        [&self.search, &self.status]
            .iter()
            .filter(|v| !inactive(v))
            .count()
    }
}

fn inactive(value: &str) -> bool {
    value.trim().is_empty()
}

fn active_str(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Active numeric bound, or None when blank or unparseable.
fn parse_decimal(value: &str) -> Option<Decimal> {
    active_str(value).and_then(|v| v.parse().ok())
}

fn parse_int(value: &str) -> Option<i64> {
    active_str(value).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn product(id: i64, name: &str, sku: &str, category: &str, quantity: i64, price: &str, min_stock: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            sku: sku.to_string(),
            quantity,
            price: Decimal::from_str(price).unwrap(),
            category: category.to_string(),
            min_stock,
            description: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn inventory() -> Vec<Product> {
        vec![
            product(1, "Power Drill", "PD-100", "Tools", 25, "89.99", 10),
            product(2, "Hammer", "HM-200", "Tools", 8, "14.50", 10),
            product(3, "Paint Roller", "PR-300", "Painting", 0, "6.75", 5),
            product(4, "Screwdriver Set", "SD-400", "Tools", 40, "24.00", 10),
            product(5, "Drop Cloth", "DC-500", "Painting", 12, "9.25", 4),
        ]
    }

    #[test]
    fn test_blank_filter_matches_everything() {
        let products = inventory();
        let filter = ProductFilter::default();
        assert_eq!(filter.apply(&products).len(), products.len());
        assert_eq!(filter.active_count(), 0);
    }

    #[test]
    fn test_search_matches_name_or_sku() {
        let products = inventory();
        let filter = ProductFilter {
            search: "drill".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&products).len(), 1);

        let by_sku = ProductFilter {
            search: "hm-200".to_string(),
            ..Default::default()
        };
        assert_eq!(by_sku.apply(&products)[0].id, 2);
    }

    #[test]
    fn test_conjunction_of_category_and_search() {
        let products = inventory();
        let filter = ProductFilter {
            search: "drill".to_string(),
            category: "Tools".to_string(),
            ..Default::default()
        };
        let matched = filter.apply(&products);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, 1);
        assert_eq!(filter.active_count(), 2);
    }

    #[test]
    fn test_stock_level_buckets() {
        let products = inventory();
        let low = ProductFilter {
            stock_level: "low".to_string(),
            ..Default::default()
        };
        // Hammer (8 <= 10) and Paint Roller (0 <= 5)
        assert_eq!(low.apply(&products).len(), 2);

        let out = ProductFilter {
            stock_level: "out".to_string(),
            ..Default::default()
        };
        assert_eq!(out.apply(&products)[0].id, 3);

        let good = ProductFilter {
            stock_level: "good".to_string(),
            ..Default::default()
        };
        // Power Drill (25 > 20), Screwdriver Set (40 > 20), Drop Cloth (12 > 8)
        assert_eq!(good.apply(&products).len(), 3);
    }

    #[test]
    fn test_price_bounds_inclusive() {
        let products = inventory();
        let filter = ProductFilter {
            min_price: "9.25".to_string(),
            max_price: "24.00".to_string(),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(&products).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4, 5]);
    }

    #[test]
    fn test_malformed_bound_is_inactive() {
        let products = inventory();
        let filter = ProductFilter {
            min_price: "not-a-number".to_string(),
            category: "Painting".to_string(),
            ..Default::default()
        };
        // min_price degrades; category still applies
        assert_eq!(filter.apply(&products).len(), 2);
    }

    #[test]
    fn test_filter_is_idempotent_and_non_mutating() {
        let products = inventory();
        let filter = ProductFilter {
            category: "Tools".to_string(),
            ..Default::default()
        };
        let first: Vec<i64> = filter.apply(&products).iter().map(|p| p.id).collect();
        let second: Vec<i64> = filter.apply(&products).iter().map(|p| p.id).collect();
        assert_eq!(first, second);
        assert_eq!(products.len(), 5);
    }

    #[test]
    fn test_purchase_order_filter() {
        use crate::models::PurchaseOrderStatus;
        let order = |id: i64, name: &str, number: &str, supplier: &str, status: PurchaseOrderStatus| {
            PurchaseOrder {
                id,
                name: name.to_string(),
                number: number.to_string(),
                supplier_id: Some(1),
                supplier_name: supplier.to_string(),
                order_date: None,
                expected_delivery_date: None,
                status,
                reference_number: String::new(),
                payment_terms: String::new(),
                currency: "USD".to_string(),
            }
        };
        let orders = vec![
            order(1, "Restock Q3", "PO-1001", "Acme Supply", PurchaseOrderStatus::Draft),
            order(2, "Paint order", "PO-1002", "ColorCo", PurchaseOrderStatus::Sent),
        ];

        let by_supplier = PurchaseOrderFilter {
            search: "acme".to_string(),
            ..Default::default()
        };
        assert_eq!(by_supplier.apply(&orders)[0].id, 1);

        let by_status = PurchaseOrderFilter {
            status: "Sent".to_string(),
            ..Default::default()
        };
        assert_eq!(by_status.apply(&orders)[0].id, 2);

        let both = PurchaseOrderFilter {
            search: "po-100".to_string(),
            status: "Draft".to_string(),
        };
        assert_eq!(both.apply(&orders).len(), 1);
        assert_eq!(both.active_count(), 2);
    }
}
