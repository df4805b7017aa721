//! Record gateway abstraction
//!
//! All persistence lives in a hosted record service that exposes generic
//! fetch/create/update/delete operations keyed by table name. The trait
//! here is the only seam the rest of the backend sees; the composition
//! root decides which implementation to inject.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::AppResult;

mod http;
#[cfg(test)]
pub mod memory;

pub use http::HttpRecordGateway;

/// A raw record as returned by the gateway: a flat JSON object whose
/// reference fields may be scalars or expanded objects.
pub type RawRecord = serde_json::Map<String, Value>;

/// Table names on the record gateway
pub mod tables {
    pub const PRODUCT: &str = "product_c";
    pub const CATEGORY: &str = "category_c";
    pub const STOCK_MOVEMENT: &str = "stock_movement_c";
    pub const PURCHASE_ORDER: &str = "purchase_order_c";
    pub const PURCHASE_ORDER_ITEM: &str = "purchase_order_item_c";
    pub const SUPPLIER: &str = "supplier_c";
    pub const COMPANY: &str = "company_c";
}

/// Comparison operators understood by the gateway's where-clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    EqualTo,
    Contains,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
}

/// A single server-side filter clause
#[derive(Debug, Clone, Serialize)]
pub struct WhereClause {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "Operator")]
    pub operator: Operator,
    #[serde(rename = "Values")]
    pub values: Vec<String>,
}

/// Sort direction for server-side ordering
#[derive(Debug, Clone, Copy, Serialize)]
pub enum SortType {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

/// A server-side order-by clause
#[derive(Debug, Clone, Serialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "sorttype")]
    pub sort_type: SortType,
}

/// Paging window for a fetch
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PagingInfo {
    pub limit: u32,
    pub offset: u32,
}

/// A gateway query: field projection plus optional filtering, ordering
/// and paging. Built with the fluent helpers below.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub fields: Vec<String>,
    pub where_clauses: Vec<WhereClause>,
    pub order_by: Vec<OrderBy>,
    pub paging: Option<PagingInfo>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(mut self, names: &[&str]) -> Self {
        self.fields = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn where_eq(mut self, field: &str, value: impl ToString) -> Self {
        self.where_clauses.push(WhereClause {
            field_name: field.to_string(),
            operator: Operator::EqualTo,
            values: vec![value.to_string()],
        });
        self
    }

    pub fn where_contains(mut self, field: &str, value: impl ToString) -> Self {
        self.where_clauses.push(WhereClause {
            field_name: field.to_string(),
            operator: Operator::Contains,
            values: vec![value.to_string()],
        });
        self
    }

    pub fn order_by_asc(mut self, field: &str) -> Self {
        self.order_by.push(OrderBy {
            field_name: field.to_string(),
            sort_type: SortType::Asc,
        });
        self
    }

    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order_by.push(OrderBy {
            field_name: field.to_string(),
            sort_type: SortType::Desc,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.paging = Some(PagingInfo { limit, offset: 0 });
        self
    }
}

/// A field-level message attached to a rejected record
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field_label: Option<String>,
    pub message: String,
}

/// One rejected record from a batch write
#[derive(Debug, Clone, Serialize)]
pub struct RecordFailure {
    pub message: Option<String>,
    pub errors: Vec<FieldError>,
}

/// Outcome of a batch write: per-record successes and failures. The
/// backend surfaces failures as-is rather than interpreting them.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: Vec<RawRecord>,
    pub failed: Vec<RecordFailure>,
}

impl BatchOutcome {
    /// For single-record writes: the persisted record, or the failures.
    pub fn into_single(mut self) -> Result<RawRecord, Vec<RecordFailure>> {
        if !self.failed.is_empty() {
            return Err(self.failed);
        }
        match self.succeeded.pop() {
            Some(record) => Ok(record),
            None => Err(Vec::new()),
        }
    }
}

/// Result of invoking a serverless function on the gateway
#[derive(Debug, Clone, Serialize)]
pub struct FunctionResult {
    pub success: bool,
    pub message: String,
}

/// The contract this backend expects from the hosted record service.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Fetch all records of a table matching the query.
    async fn fetch_records(&self, table: &str, query: &Query) -> AppResult<Vec<RawRecord>>;

    /// Fetch a single record by id. `None` when the record does not exist.
    async fn fetch_record(&self, table: &str, id: i64, query: &Query)
        -> AppResult<Option<RawRecord>>;

    /// Create records; ids are assigned by the gateway.
    async fn create_records(&self, table: &str, records: Vec<RawRecord>)
        -> AppResult<BatchOutcome>;

    /// Update records; each record must carry its `Id`.
    async fn update_records(&self, table: &str, records: Vec<RawRecord>)
        -> AppResult<BatchOutcome>;

    /// Delete records by id.
    async fn delete_records(&self, table: &str, ids: &[i64]) -> AppResult<BatchOutcome>;

    /// Invoke a serverless function hosted next to the record store.
    async fn invoke_function(&self, name: &str, payload: Value) -> AppResult<FunctionResult>;

    /// Cheap reachability probe for the health endpoint.
    async fn ping(&self) -> bool;
}
