//! Stock movement service
//!
//! Movements are an append-only journal: create and read, never edit or
//! delete. Corrections are recorded as new movements. Quantity changes to
//! the owning product go through the product adjust-stock operation.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use shared::{MovementDirection, StockMovement};

use crate::error::{AppError, AppResult};
use crate::gateway::{tables, Query, RecordGateway};
use crate::normalize::movement_from_record;
use crate::services::product::object;

const MOVEMENT_FIELDS: &[&str] = &[
    "Name",
    "product_c",
    "direction_c",
    "quantity_c",
    "note_c",
    "timestamp_c",
    "CreatedOn",
];

/// Payload for recording a movement directly in the journal
#[derive(Debug, Clone, Deserialize)]
pub struct MovementInput {
    pub product_id: i64,
    pub direction: MovementDirection,
    pub quantity: i64,
    #[serde(default)]
    pub note: String,
}

/// Service for the stock movement journal
pub struct MovementService {
    gateway: Arc<dyn RecordGateway>,
}

impl MovementService {
    pub fn new(gateway: Arc<dyn RecordGateway>) -> Self {
        Self { gateway }
    }

    /// All movements, newest first. Degrades to empty when unreachable.
    pub async fn list(&self) -> AppResult<Vec<StockMovement>> {
        let query = Query::new()
            .fields(MOVEMENT_FIELDS)
            .order_by_desc("timestamp_c");
        let records = match self
            .gateway
            .fetch_records(tables::STOCK_MOVEMENT, &query)
            .await
        {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("movement fetch failed, serving empty listing: {}", err);
                Vec::new()
            }
        };
        let mut movements: Vec<StockMovement> =
            records.iter().map(movement_from_record).collect();
        movements.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(movements)
    }

    pub async fn get(&self, id: i64) -> AppResult<StockMovement> {
        let query = Query::new().fields(MOVEMENT_FIELDS);
        let record = self
            .gateway
            .fetch_record(tables::STOCK_MOVEMENT, id, &query)
            .await?
            .ok_or_else(|| AppError::NotFound("Stock movement".to_string()))?;
        Ok(movement_from_record(&record))
    }

    pub async fn create(&self, input: MovementInput) -> AppResult<StockMovement> {
        if input.quantity <= 0 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be positive".to_string(),
            });
        }
        let product = self
            .gateway
            .fetch_record(tables::PRODUCT, input.product_id, &Query::new().fields(&["Name"]))
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
        let product_name = product
            .get("Name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let record = object(json!({
            "Name": format!("{} {} x{}", product_name, input.direction.as_str(), input.quantity),
            "product_c": input.product_id,
            "direction_c": input.direction.as_str(),
            "quantity_c": input.quantity,
            "note_c": input.note,
            "timestamp_c": chrono::Utc::now().to_rfc3339(),
        }));
        let outcome = self
            .gateway
            .create_records(tables::STOCK_MOVEMENT, vec![record])
            .await?;
        let created = outcome.into_single().map_err(|failures| {
            AppError::BatchRejected {
                resource: "stock movement".to_string(),
                failures,
            }
        })?;
        Ok(movement_from_record(&created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::MemoryGateway;

    fn seeded() -> (Arc<MemoryGateway>, MovementService) {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.seed(
            tables::PRODUCT,
            vec![object(json!({ "Id": 1, "Name": "Power Drill" }))],
        );
        gateway.seed(
            tables::STOCK_MOVEMENT,
            vec![
                object(json!({
                    "Id": 10,
                    "product_c": 1,
                    "direction_c": "in",
                    "quantity_c": 5,
                    "timestamp_c": "2024-05-01T08:00:00Z",
                })),
                object(json!({
                    "Id": 11,
                    "product_c": 1,
                    "direction_c": "out",
                    "quantity_c": 2,
                    "timestamp_c": "2024-05-02T08:00:00Z",
                })),
            ],
        );
        let service = MovementService::new(gateway.clone());
        (gateway, service)
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_, service) = seeded();
        let movements = service.list().await.unwrap();
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].id, 11);
        assert_eq!(movements[1].id, 10);
    }

    #[tokio::test]
    async fn test_create_requires_existing_product() {
        let (_, service) = seeded();
        let result = service
            .create(MovementInput {
                product_id: 99,
                direction: MovementDirection::In,
                quantity: 3,
                note: String::new(),
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_appends_journal_entry() {
        let (gateway, service) = seeded();
        let movement = service
            .create(MovementInput {
                product_id: 1,
                direction: MovementDirection::Out,
                quantity: 1,
                note: "damaged".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(movement.direction, MovementDirection::Out);
        assert_eq!(movement.note, "damaged");
        assert_eq!(gateway.records(tables::STOCK_MOVEMENT).len(), 3);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let (_, service) = seeded();
        let result = service
            .create(MovementInput {
                product_id: 1,
                direction: MovementDirection::In,
                quantity: 0,
                note: String::new(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
