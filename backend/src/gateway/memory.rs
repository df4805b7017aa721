//! In-memory record gateway used by service tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppResult;

use super::{
    BatchOutcome, FunctionResult, Operator, Query, RawRecord, RecordFailure, RecordGateway,
};

/// Test double holding records per table behind a mutex. Supports the
/// EqualTo and Contains operators the services actually use; ordering is
/// ignored because every caller that depends on order sorts in memory.
#[derive(Default)]
pub struct MemoryGateway {
    tables: Mutex<HashMap<String, Vec<RawRecord>>>,
    next_id: Mutex<i64>,
    pub invoked_functions: Mutex<Vec<(String, Value)>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(1),
            ..Default::default()
        }
    }

    /// Seed a table with records, assigning ids to records without one.
    pub fn seed(&self, table: &str, records: Vec<RawRecord>) {
        let mut tables = self.tables.lock().unwrap();
        let stored = tables.entry(table.to_string()).or_default();
        for mut record in records {
            if !record.contains_key("Id") {
                record.insert("Id".to_string(), Value::from(self.allocate_id()));
            }
            stored.push(record);
        }
    }

    pub fn records(&self, table: &str) -> Vec<RawRecord> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn allocate_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        id
    }

    fn matches(record: &RawRecord, query: &Query) -> bool {
        query.where_clauses.iter().all(|clause| {
            let value = record.get(&clause.field_name);
            let text = match value {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Object(map)) => map
                    .get("Id")
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            };
            match clause.operator {
                Operator::EqualTo => clause.values.iter().any(|v| *v == text),
                Operator::Contains => clause
                    .values
                    .iter()
                    .any(|v| text.to_lowercase().contains(&v.to_lowercase())),
                Operator::GreaterThanOrEqualTo | Operator::LessThanOrEqualTo => true,
            }
        })
    }

    fn record_id(record: &RawRecord) -> Option<i64> {
        record.get("Id").and_then(Value::as_i64)
    }
}

#[async_trait]
impl RecordGateway for MemoryGateway {
    async fn fetch_records(&self, table: &str, query: &Query) -> AppResult<Vec<RawRecord>> {
        Ok(self
            .records(table)
            .into_iter()
            .filter(|r| Self::matches(r, query))
            .collect())
    }

    async fn fetch_record(
        &self,
        table: &str,
        id: i64,
        _query: &Query,
    ) -> AppResult<Option<RawRecord>> {
        Ok(self
            .records(table)
            .into_iter()
            .find(|r| Self::record_id(r) == Some(id)))
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<RawRecord>,
    ) -> AppResult<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        let mut tables = self.tables.lock().unwrap();
        let stored = tables.entry(table.to_string()).or_default();
        for mut record in records {
            record.insert("Id".to_string(), Value::from(self.allocate_id()));
            stored.push(record.clone());
            outcome.succeeded.push(record);
        }
        Ok(outcome)
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<RawRecord>,
    ) -> AppResult<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        let mut tables = self.tables.lock().unwrap();
        let stored = tables.entry(table.to_string()).or_default();
        for record in records {
            let id = Self::record_id(&record);
            match stored
                .iter_mut()
                .find(|existing| Self::record_id(existing) == id)
            {
                Some(existing) => {
                    for (key, value) in record.iter() {
                        existing.insert(key.clone(), value.clone());
                    }
                    outcome.succeeded.push(existing.clone());
                }
                None => outcome.failed.push(RecordFailure {
                    message: Some("Record does not exist".to_string()),
                    errors: Vec::new(),
                }),
            }
        }
        Ok(outcome)
    }

    async fn delete_records(&self, table: &str, ids: &[i64]) -> AppResult<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        let mut tables = self.tables.lock().unwrap();
        let stored = tables.entry(table.to_string()).or_default();
        for &id in ids {
            let before = stored.len();
            stored.retain(|r| Self::record_id(r) != Some(id));
            if stored.len() < before {
                let mut deleted = RawRecord::new();
                deleted.insert("Id".to_string(), Value::from(id));
                outcome.succeeded.push(deleted);
            } else {
                outcome.failed.push(RecordFailure {
                    message: Some(format!("Record {} does not exist", id)),
                    errors: Vec::new(),
                });
            }
        }
        Ok(outcome)
    }

    async fn invoke_function(&self, name: &str, payload: Value) -> AppResult<FunctionResult> {
        self.invoked_functions
            .lock()
            .unwrap()
            .push((name.to_string(), payload));
        Ok(FunctionResult {
            success: true,
            message: "ok".to_string(),
        })
    }

    async fn ping(&self) -> bool {
        true
    }
}
