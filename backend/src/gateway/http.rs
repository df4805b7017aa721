//! HTTPS client for the hosted record API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::GatewayConfig;
use crate::error::{AppError, AppResult};

use super::{
    BatchOutcome, FieldError, FunctionResult, Query, RawRecord, RecordFailure, RecordGateway,
};

/// Record gateway client over HTTPS
#[derive(Clone)]
pub struct HttpRecordGateway {
    client: Client,
    base_url: String,
    project_id: String,
    api_key: String,
    page_size: u32,
}

/// Envelope every gateway response arrives in
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    results: Option<Vec<RecordResult>>,
}

/// Per-record outcome inside a batch write response
#[derive(Debug, Deserialize)]
struct RecordResult {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<RawRecord>,
    #[serde(default)]
    errors: Option<Vec<WireFieldError>>,
}

#[derive(Debug, Deserialize)]
struct WireFieldError {
    #[serde(rename = "fieldLabel")]
    field_label: Option<String>,
    message: String,
}

impl HttpRecordGateway {
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        if config.base_url.is_empty() {
            return Err(AppError::Configuration(
                "gateway.base_url is not set".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value) -> AppResult<ApiEnvelope> {
        self.send(self.client.post(self.url(path)).json(&body)).await
    }

    async fn patch(&self, path: &str, body: Value) -> AppResult<ApiEnvelope> {
        self.send(self.client.patch(self.url(path)).json(&body)).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<ApiEnvelope> {
        let response = request
            .header("x-project-id", &self.project_id)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::Gateway(format!("malformed gateway response: {}", e)))?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "gateway reported failure".to_string());
            return Err(AppError::Gateway(message));
        }
        Ok(envelope)
    }

    /// Serialize a [`Query`] into the gateway's wire shape.
    fn wire_query(query: &Query) -> Value {
        let mut body = json!({
            "fields": query
                .fields
                .iter()
                .map(|name| json!({ "field": { "Name": name } }))
                .collect::<Vec<_>>(),
        });
        if !query.where_clauses.is_empty() {
            body["where"] = json!(query.where_clauses);
        }
        if !query.order_by.is_empty() {
            body["orderBy"] = json!(query.order_by);
        }
        if let Some(paging) = query.paging {
            body["pagingInfo"] = json!(paging);
        }
        body
    }

    fn collect_outcome(results: Vec<RecordResult>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for result in results {
            if result.success {
                if let Some(record) = result.data {
                    outcome.succeeded.push(record);
                }
            } else {
                outcome.failed.push(RecordFailure {
                    message: result.message,
                    errors: result
                        .errors
                        .unwrap_or_default()
                        .into_iter()
                        .map(|e| FieldError {
                            field_label: e.field_label,
                            message: e.message,
                        })
                        .collect(),
                });
            }
        }
        outcome
    }
}

#[async_trait]
impl RecordGateway for HttpRecordGateway {
    async fn fetch_records(&self, table: &str, query: &Query) -> AppResult<Vec<RawRecord>> {
        let mut body = Self::wire_query(query);
        // Full-collection loads are bounded by the configured page size
        if query.paging.is_none() {
            body["pagingInfo"] = json!({ "limit": self.page_size, "offset": 0 });
        }
        let envelope = self
            .post(&format!("tables/{}/fetch", table), body)
            .await?;

        let records = match envelope.data {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(records)
    }

    async fn fetch_record(
        &self,
        table: &str,
        id: i64,
        query: &Query,
    ) -> AppResult<Option<RawRecord>> {
        let envelope = self
            .post(
                &format!("tables/{}/{}/fetch", table, id),
                Self::wire_query(query),
            )
            .await?;

        Ok(match envelope.data {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        })
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<RawRecord>,
    ) -> AppResult<BatchOutcome> {
        let envelope = self
            .post(
                &format!("tables/{}/records", table),
                json!({ "records": records }),
            )
            .await?;
        Ok(Self::collect_outcome(envelope.results.unwrap_or_default()))
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<RawRecord>,
    ) -> AppResult<BatchOutcome> {
        let envelope = self
            .patch(
                &format!("tables/{}/records", table),
                json!({ "records": records }),
            )
            .await?;
        Ok(Self::collect_outcome(envelope.results.unwrap_or_default()))
    }

    async fn delete_records(&self, table: &str, ids: &[i64]) -> AppResult<BatchOutcome> {
        let envelope = self
            .post(
                &format!("tables/{}/records/delete", table),
                json!({ "RecordIds": ids }),
            )
            .await?;
        Ok(Self::collect_outcome(envelope.results.unwrap_or_default()))
    }

    async fn invoke_function(&self, name: &str, payload: Value) -> AppResult<FunctionResult> {
        let envelope = self
            .post(&format!("functions/{}/invoke", name), payload)
            .await?;
        Ok(FunctionResult {
            success: envelope.success,
            message: envelope.message.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> bool {
        self.client
            .get(self.url("health"))
            .header("x-project-id", &self.project_id)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}
