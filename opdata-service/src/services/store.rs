use crate::models::OpData;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use service_core::error::AppError;

/// Result of a `$set` update against a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Access to the one collection holding OpData records.
#[async_trait]
pub trait OpDataStore: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    /// Insert a record without an id and return the id the store assigned.
    async fn insert(&self, record: &OpData) -> Result<ObjectId, AppError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<OpData>, AppError>;

    /// Every record in store order. A failure while draining the cursor
    /// discards whatever was already read.
    async fn find_all(&self) -> Result<Vec<OpData>, AppError>;

    /// Apply `fields` with `$set` semantics to the record named by `id`.
    async fn update_fields(&self, id: ObjectId, fields: Document)
        -> Result<UpdateOutcome, AppError>;

    /// Returns the number of records deleted (0 or 1).
    async fn delete(&self, id: ObjectId) -> Result<u64, AppError>;
}
