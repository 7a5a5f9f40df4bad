use crate::models::{OpData, OpDataPatch};
use crate::services::metrics::record_store_operation;
use crate::services::store::OpDataStore;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// The five record operations. Input is validated before the store is
/// touched, and each operation makes exactly one store call bounded by
/// `timeout`.
#[derive(Clone)]
pub struct OpDataService {
    store: Arc<dyn OpDataStore>,
    timeout: Duration,
}

impl OpDataService {
    pub fn new(store: Arc<dyn OpDataStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Store connectivity check, bounded by the same deadline as the
    /// record operations.
    pub async fn ping(&self) -> Result<(), AppError> {
        tokio::time::timeout(self.timeout, self.store.ping()).await?
    }

    pub async fn create(&self, body: &[u8]) -> Result<ObjectId, AppError> {
        let record = OpData::from(parse_body(body)?);
        let id = self
            .bounded("create", self.store.insert(&record))
            .await?;

        tracing::info!(id = %id, "Record created");
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> Result<OpData, AppError> {
        let oid = parse_id(id)?;
        self.bounded("get", self.store.find_by_id(oid))
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn all(&self) -> Result<Vec<OpData>, AppError> {
        self.bounded("list", self.store.find_all()).await
    }

    /// Returns the modified count; a match that changed nothing is still a
    /// success with a count of 0.
    pub async fn update(&self, id: &str, body: &[u8]) -> Result<u64, AppError> {
        let oid = parse_id(id)?;
        let patch = parse_body(body)?;
        if patch.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Update body must set at least one of first_name, last_name, email"
            )));
        }
        let fields = patch.to_set_document().map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Invalid update body: {}", e))
        })?;

        let outcome = self
            .bounded("update", self.store.update_fields(oid, fields))
            .await?;
        if outcome.matched == 0 {
            return Err(not_found(id));
        }

        tracing::info!(id = %oid, modified = outcome.modified, "Record updated");
        Ok(outcome.modified)
    }

    pub async fn delete(&self, id: &str) -> Result<u64, AppError> {
        let oid = parse_id(id)?;
        let deleted = self.bounded("delete", self.store.delete(oid)).await?;
        if deleted == 0 {
            return Err(not_found(id));
        }

        tracing::info!(id = %oid, "Record deleted");
        Ok(deleted)
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store call abandoned after deadline"
                );
                Err(AppError::Timeout(format!(
                    "{} did not complete within {:?}",
                    operation, self.timeout
                )))
            }
        };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(AppError::Timeout(_)) => "timeout",
            Err(_) => "error",
        };
        record_store_operation(operation, outcome);

        result
    }
}

/// Parse a 24-character hex ObjectId.
pub fn parse_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid id '{}': {}", raw, e)))
}

/// Parse a JSON object body into a patch. Non-objects are rejected even when
/// they are valid JSON.
pub fn parse_body(body: &[u8]) -> Result<OpDataPatch, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid JSON body: {}", e)))?;
    if !value.is_object() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Request body must be a JSON object"
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid request body: {}", e)))
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No document found with id {}", id))
}
