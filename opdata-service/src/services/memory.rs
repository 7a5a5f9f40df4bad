//! In-process [`OpDataStore`] used by the router and service tests.

use crate::models::{OpData, OpDataPatch};
use crate::services::store::{OpDataStore, UpdateOutcome};
use async_trait::async_trait;
use mongodb::bson::{self, oid::ObjectId, Document};
use service_core::error::AppError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<OpData>>,
    latency: Option<Duration>,
    failing: bool,
    calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` before touching the data.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Every call fails with a database error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Number of store calls made so far, `ping` excluded.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "connection refused"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl OpDataStore for InMemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "connection refused"
            )));
        }
        Ok(())
    }

    async fn insert(&self, record: &OpData) -> Result<ObjectId, AppError> {
        self.enter().await?;
        let id = ObjectId::new();
        let mut stored = record.clone();
        stored.id = Some(id);
        self.records.write().await.push(stored);
        Ok(id)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<OpData>, AppError> {
        self.enter().await?;
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == Some(id)).cloned())
    }

    async fn find_all(&self) -> Result<Vec<OpData>, AppError> {
        self.enter().await?;
        Ok(self.records.read().await.clone())
    }

    async fn update_fields(
        &self,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, AppError> {
        self.enter().await?;
        let patch: OpDataPatch = bson::from_document(fields)
            .map_err(|e| AppError::DatabaseError(anyhow::Error::new(e)))?;

        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| r.id == Some(id)) else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };

        let before = record.clone();
        patch.apply_to(record);
        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(*record != before),
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, AppError> {
        self.enter().await?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != Some(id));
        Ok((before - records.len()) as u64)
    }
}
