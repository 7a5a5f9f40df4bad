use crate::models::OpData;
use crate::services::store::{OpDataStore, UpdateOutcome};
use async_trait::async_trait;
use futures::{TryStream, TryStreamExt};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Client as MongoClient, Collection,
};
use service_core::error::AppError;
use std::time::Duration;

#[derive(Clone)]
pub struct OpDataDb {
    client: MongoClient,
    collection: Collection<OpData>,
}

impl OpDataDb {
    /// Connect and ping within `ping_timeout`. The service refuses to start
    /// when this fails.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
        ping_timeout: Duration,
    ) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;

        let db = Self {
            collection: client.database(database).collection(collection),
            client,
        };

        tokio::time::timeout(ping_timeout, db.ping())
            .await
            .map_err(|_| {
                tracing::error!(
                    timeout_secs = ping_timeout.as_secs(),
                    "MongoDB did not answer ping in time"
                );
                AppError::Timeout(format!(
                    "MongoDB ping did not complete within {:?}",
                    ping_timeout
                ))
            })??;

        tracing::info!(
            database = %database,
            collection = %collection,
            "Connected to MongoDB!"
        );
        Ok(db)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl OpDataStore for OpDataDb {
    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn insert(&self, record: &OpData) -> Result<ObjectId, AppError> {
        let result = self
            .collection
            .insert_one(record, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert record: {}", e);
                AppError::from(e)
            })?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!(
                "Store returned a non-ObjectId identifier: {}",
                result.inserted_id
            ))
        })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<OpData>, AppError> {
        self.collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(id = %id, "Failed to find record: {}", e);
                AppError::from(e)
            })
    }

    async fn find_all(&self) -> Result<Vec<OpData>, AppError> {
        let cursor = self.collection.find(doc! {}, None).await.map_err(|e| {
            tracing::error!("Failed to list records: {}", e);
            AppError::from(e)
        })?;

        drain(cursor).await.map_err(|e| {
            tracing::error!("Failed to read record from cursor: {}", e);
            AppError::from(e)
        })
    }

    async fn update_fields(
        &self,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, AppError> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
            .await
            .map_err(|e| {
                tracing::error!(id = %id, "Failed to update record: {}", e);
                AppError::from(e)
            })?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, AppError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(id = %id, "Failed to delete record: {}", e);
                AppError::from(e)
            })?;

        Ok(result.deleted_count)
    }
}

/// Collect every item of a cursor. The first error aborts the drain and the
/// records buffered so far are dropped, so callers never see a partial list.
async fn drain<S>(mut cursor: S) -> Result<Vec<S::Ok>, S::Error>
where
    S: TryStream + Unpin,
{
    let mut records = Vec::new();
    while let Some(record) = cursor.try_next().await? {
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn test_drain_collects_every_record() {
        let cursor = stream::iter(vec![Ok::<_, String>(1), Ok(2), Ok(3)]);
        assert_eq!(drain(cursor).await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_drain_failure_discards_buffered_records() {
        let cursor = stream::iter(vec![
            Ok(1),
            Ok(2),
            Err("cursor killed".to_string()),
            Ok(3),
        ]);

        let result: Result<Vec<i32>, String> = drain(cursor).await;
        assert_eq!(result, Err("cursor killed".to_string()));
    }
}
