//! Product service

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shared::{
    preview_quantity, validate_adjustment, validate_price, validate_quantity, validate_required,
    MovementDirection, Product, ProductFilter, StockMovement,
};

use crate::error::{AppError, AppResult};
use crate::gateway::{tables, Query, RecordGateway};
use crate::normalize::{movement_from_record, product_from_record};

/// Projection requested on every product read
const PRODUCT_FIELDS: &[&str] = &[
    "Name",
    "sku_c",
    "quantity_c",
    "price_c",
    "category_c",
    "min_stock_c",
    "description_c",
    "CreatedOn",
    "ModifiedOn",
];

/// Payload for creating or updating a product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub min_stock: i64,
    #[serde(default)]
    pub description: String,
}

/// A pending stock adjustment
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustStockInput {
    pub direction: MovementDirection,
    pub quantity: i64,
    #[serde(default)]
    pub note: String,
}

/// Result of a stock adjustment: the recorded movement plus the product
/// with its new on-hand quantity.
#[derive(Debug, Serialize)]
pub struct StockAdjustment {
    pub product: Product,
    pub movement: StockMovement,
}

/// A filtered product listing with the counts the console shows alongside it
#[derive(Debug, Serialize)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub total_count: usize,
    pub filtered_count: usize,
    pub active_filter_count: usize,
}

/// Service for product operations
pub struct ProductService {
    gateway: Arc<dyn RecordGateway>,
}

impl ProductService {
    pub fn new(gateway: Arc<dyn RecordGateway>) -> Self {
        Self { gateway }
    }

    /// Load every product and evaluate the filter in memory. A failed read
    /// degrades to an empty listing rather than an error page.
    pub async fn list(&self, filter: &ProductFilter) -> AppResult<ProductListing> {
        let query = Query::new().fields(PRODUCT_FIELDS).order_by_desc("CreatedOn");
        let records = match self.gateway.fetch_records(tables::PRODUCT, &query).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("product fetch failed, serving empty listing: {}", err);
                Vec::new()
            }
        };

        let products: Vec<Product> = records.iter().map(product_from_record).collect();
        let filtered: Vec<Product> = filter.apply(&products).into_iter().cloned().collect();

        Ok(ProductListing {
            total_count: products.len(),
            filtered_count: filtered.len(),
            active_filter_count: filter.active_count(),
            products: filtered,
        })
    }

    pub async fn get(&self, id: i64) -> AppResult<Product> {
        let query = Query::new().fields(PRODUCT_FIELDS);
        let record = self
            .gateway
            .fetch_record(tables::PRODUCT, id, &query)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
        Ok(product_from_record(&record))
    }

    pub async fn create(&self, input: ProductInput) -> AppResult<Product> {
        validate(&input)?;
        let outcome = self
            .gateway
            .create_records(tables::PRODUCT, vec![write_record(&input, None)])
            .await?;
        let record = outcome.into_single().map_err(|failures| {
            AppError::BatchRejected {
                resource: "product".to_string(),
                failures,
            }
        })?;
        Ok(product_from_record(&record))
    }

    pub async fn update(&self, id: i64, input: ProductInput) -> AppResult<Product> {
        validate(&input)?;
        // Surface a 404 before the gateway turns a missing id into a batch failure
        self.get(id).await?;
        let outcome = self
            .gateway
            .update_records(tables::PRODUCT, vec![write_record(&input, Some(id))])
            .await?;
        let record = outcome.into_single().map_err(|failures| {
            AppError::BatchRejected {
                resource: "product".to_string(),
                failures,
            }
        })?;
        Ok(product_from_record(&record))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let outcome = self.gateway.delete_records(tables::PRODUCT, &[id]).await?;
        if !outcome.failed.is_empty() {
            return Err(AppError::BatchRejected {
                resource: "product".to_string(),
                failures: outcome.failed,
            });
        }
        Ok(())
    }

    /// Record a stock movement and persist the product's new quantity.
    /// Over-withdrawals are rejected before anything is written.
    pub async fn adjust_stock(&self, id: i64, input: AdjustStockInput) -> AppResult<StockAdjustment> {
        let product = self.get(id).await?;

        validate_adjustment(product.quantity, input.direction, input.quantity)
            .map_err(|message| AppError::ValidationError(message.to_string()))?;
        let new_quantity = preview_quantity(product.quantity, input.direction, input.quantity);

        let movement_record = object(json!({
            "Name": format!("{} {} x{}", product.name, input.direction.as_str(), input.quantity),
            "product_c": id,
            "direction_c": input.direction.as_str(),
            "quantity_c": input.quantity,
            "note_c": input.note,
            "timestamp_c": chrono::Utc::now().to_rfc3339(),
        }));
        let outcome = self
            .gateway
            .create_records(tables::STOCK_MOVEMENT, vec![movement_record])
            .await?;
        let movement = outcome.into_single().map_err(|failures| {
            AppError::BatchRejected {
                resource: "stock movement".to_string(),
                failures,
            }
        })?;

        let patch = object(json!({ "Id": id, "quantity_c": new_quantity }));
        let outcome = self
            .gateway
            .update_records(tables::PRODUCT, vec![patch])
            .await?;
        let record = outcome.into_single().map_err(|failures| {
            AppError::BatchRejected {
                resource: "product".to_string(),
                failures,
            }
        })?;

        Ok(StockAdjustment {
            product: product_from_record(&record),
            movement: movement_from_record(&movement),
        })
    }
}

fn validate(input: &ProductInput) -> AppResult<()> {
    validate_required(&input.name).map_err(|message| AppError::Validation {
        field: "name".to_string(),
        message: message.to_string(),
    })?;
    validate_required(&input.sku).map_err(|message| AppError::Validation {
        field: "sku".to_string(),
        message: message.to_string(),
    })?;
    validate_quantity(input.quantity).map_err(|message| AppError::Validation {
        field: "quantity".to_string(),
        message: message.to_string(),
    })?;
    validate_quantity(input.min_stock).map_err(|message| AppError::Validation {
        field: "min_stock".to_string(),
        message: message.to_string(),
    })?;
    validate_price(input.price).map_err(|message| AppError::Validation {
        field: "price".to_string(),
        message: message.to_string(),
    })?;
    Ok(())
}

fn write_record(input: &ProductInput, id: Option<i64>) -> crate::gateway::RawRecord {
    let mut record = object(json!({
        "Name": input.name.trim(),
        "sku_c": input.sku.trim(),
        "quantity_c": input.quantity,
        "price_c": input.price,
        "min_stock_c": input.min_stock,
        "description_c": input.description,
    }));
    if let Some(category_id) = input.category_id {
        record.insert("category_c".to_string(), Value::from(category_id));
    }
    if let Some(id) = id {
        record.insert("Id".to_string(), Value::from(id));
    }
    record
}

/// json! always builds an object here; anything else is a programming error.
pub(crate) fn object(value: Value) -> crate::gateway::RawRecord {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("record payloads are objects"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::MemoryGateway;
    use std::str::FromStr;

    fn seeded() -> (Arc<MemoryGateway>, ProductService) {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.seed(
            tables::PRODUCT,
            vec![
                object(json!({
                    "Name": "Power Drill",
                    "sku_c": "PD-100",
                    "quantity_c": 25,
                    "price_c": "89.99",
                    "category_c": { "Id": 7, "Name": "Tools" },
                    "min_stock_c": 10,
                })),
                object(json!({
                    "Name": "Hammer",
                    "sku_c": "HM-200",
                    "quantity_c": 8,
                    "price_c": "14.50",
                    "min_stock_c": 10,
                })),
            ],
        );
        let service = ProductService::new(gateway.clone());
        (gateway, service)
    }

    fn input(name: &str, sku: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            sku: sku.to_string(),
            quantity: 5,
            price: Decimal::from_str("9.99").unwrap(),
            category_id: None,
            min_stock: 2,
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_list_applies_filter_and_counts() {
        let (_, service) = seeded();
        let filter = ProductFilter {
            search: "drill".to_string(),
            ..Default::default()
        };
        let listing = service.list(&filter).await.unwrap();
        assert_eq!(listing.total_count, 2);
        assert_eq!(listing.filtered_count, 1);
        assert_eq!(listing.active_filter_count, 1);
        assert_eq!(listing.products[0].name, "Power Drill");
        assert_eq!(listing.products[0].category, "Tools");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_, service) = seeded();
        assert!(matches!(
            service.get(999).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_validates_name() {
        let (_, service) = seeded();
        let result = service.create(input("  ", "SKU-1")).await;
        assert!(matches!(
            result,
            Err(AppError::Validation { ref field, .. }) if field == "name"
        ));
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let (_, service) = seeded();
        let product = service.create(input("Wrench", "WR-300")).await.unwrap();
        assert!(product.id > 0);
        assert_eq!(product.sku, "WR-300");
    }

    #[tokio::test]
    async fn test_adjust_stock_in() {
        let (gateway, service) = seeded();
        let adjustment = service
            .adjust_stock(
                1,
                AdjustStockInput {
                    direction: MovementDirection::In,
                    quantity: 5,
                    note: "restock".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(adjustment.product.quantity, 30);
        assert_eq!(adjustment.movement.quantity, 5);
        assert_eq!(gateway.records(tables::STOCK_MOVEMENT).len(), 1);
    }

    #[tokio::test]
    async fn test_adjust_stock_rejects_over_withdrawal() {
        let (gateway, service) = seeded();
        let result = service
            .adjust_stock(
                2,
                AdjustStockInput {
                    direction: MovementDirection::Out,
                    quantity: 9,
                    note: String::new(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        // Nothing written on rejection
        assert!(gateway.records(tables::STOCK_MOVEMENT).is_empty());
    }

    #[tokio::test]
    async fn test_adjust_stock_out_to_zero() {
        let (_, service) = seeded();
        let adjustment = service
            .adjust_stock(
                2,
                AdjustStockInput {
                    direction: MovementDirection::Out,
                    quantity: 8,
                    note: String::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(adjustment.product.quantity, 0);
    }
}
