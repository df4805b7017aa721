//! Company service

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use shared::{join_tags, validate_email, validate_required, Company};

use crate::error::{AppError, AppResult};
use crate::gateway::{tables, Query, RecordGateway};
use crate::normalize::company_from_record;
use crate::services::product::object;

const COMPANY_FIELDS: &[&str] = &[
    "Name",
    "Tags",
    "contactInformation_c",
    "address_c",
    "email_c",
    "phone_c",
    "supplier_c",
    "CreatedOn",
    "ModifiedOn",
];

/// Payload for creating or updating a company
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    #[serde(default)]
    pub contact_information: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub supplier_id: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Service for company operations
pub struct CompanyService {
    gateway: Arc<dyn RecordGateway>,
}

impl CompanyService {
    pub fn new(gateway: Arc<dyn RecordGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> AppResult<Vec<Company>> {
        let query = Query::new().fields(COMPANY_FIELDS).order_by_asc("Name");
        let records = match self.gateway.fetch_records(tables::COMPANY, &query).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("company fetch failed, serving empty listing: {}", err);
                Vec::new()
            }
        };
        Ok(records.iter().map(company_from_record).collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<Company> {
        let query = Query::new().fields(COMPANY_FIELDS);
        let record = self
            .gateway
            .fetch_record(tables::COMPANY, id, &query)
            .await?
            .ok_or_else(|| AppError::NotFound("Company".to_string()))?;
        Ok(company_from_record(&record))
    }

    pub async fn create(&self, input: CompanyInput) -> AppResult<Company> {
        validate(&input)?;
        let outcome = self
            .gateway
            .create_records(tables::COMPANY, vec![write_record(&input, None)])
            .await?;
        let record = outcome.into_single().map_err(|failures| {
            AppError::BatchRejected {
                resource: "company".to_string(),
                failures,
            }
        })?;
        Ok(company_from_record(&record))
    }

    pub async fn update(&self, id: i64, input: CompanyInput) -> AppResult<Company> {
        validate(&input)?;
        self.get(id).await?;
        let outcome = self
            .gateway
            .update_records(tables::COMPANY, vec![write_record(&input, Some(id))])
            .await?;
        let record = outcome.into_single().map_err(|failures| {
            AppError::BatchRejected {
                resource: "company".to_string(),
                failures,
            }
        })?;
        Ok(company_from_record(&record))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let outcome = self.gateway.delete_records(tables::COMPANY, &[id]).await?;
        if !outcome.failed.is_empty() {
            return Err(AppError::BatchRejected {
                resource: "company".to_string(),
                failures: outcome.failed,
            });
        }
        Ok(())
    }
}

fn validate(input: &CompanyInput) -> AppResult<()> {
    validate_required(&input.name).map_err(|message| AppError::Validation {
        field: "name".to_string(),
        message: message.to_string(),
    })?;
    if !input.email.trim().is_empty() {
        validate_email(input.email.trim()).map_err(|message| AppError::Validation {
            field: "email".to_string(),
            message: message.to_string(),
        })?;
    }
    Ok(())
}

fn write_record(input: &CompanyInput, id: Option<i64>) -> crate::gateway::RawRecord {
    let mut record = object(json!({
        "Name": input.name.trim(),
        "Tags": join_tags(&input.tags),
        "contactInformation_c": input.contact_information,
        "address_c": input.address,
        "email_c": input.email.trim(),
        "phone_c": input.phone,
        "supplier_c": input.supplier_id.map(Value::from).unwrap_or(Value::Null),
    }));
    if let Some(id) = id {
        record.insert("Id".to_string(), Value::from(id));
    }
    record
}
