//! Company model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A company record, optionally linked back to a supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub contact_information: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub supplier_id: Option<i64>,
    pub supplier_name: String,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
