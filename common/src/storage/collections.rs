use std::sync::Arc;

use tracing::{info, instrument};

use super::{
    engine::SearchEngine,
    types::{CollectionAck, CollectionRef},
};
use crate::error::AppError;

/// Creates and verifies collections through the engine's collections API.
#[derive(Clone)]
pub struct CollectionManager {
    engine: Arc<dyn SearchEngine>,
    shard_count: u32,
    replication_factor: u32,
}

impl CollectionManager {
    pub fn new(engine: Arc<dyn SearchEngine>, shard_count: u32, replication_factor: u32) -> Self {
        Self {
            engine,
            shard_count,
            replication_factor,
        }
    }

    pub async fn exists(&self, collection: &CollectionRef) -> Result<bool, AppError> {
        let names = self
            .engine
            .list_collections()
            .await
            .map_err(|e| AppError::EngineUnavailable(e.to_string()))?;
        Ok(names.iter().any(|name| name == collection.as_str()))
    }

    pub async fn ensure_exists(&self, collection: &CollectionRef) -> Result<(), AppError> {
        if self.exists(collection).await? {
            Ok(())
        } else {
            Err(AppError::CollectionNotFound(collection.to_string()))
        }
    }

    /// Creates the collection unless it already exists. Never touches an existing one.
    #[instrument(skip_all, fields(collection = %collection))]
    pub async fn create(&self, collection: &CollectionRef) -> Result<CollectionAck, AppError> {
        let creation_error = |message: String| AppError::CollectionCreationError {
            collection: collection.to_string(),
            message,
        };

        let existing = self
            .engine
            .list_collections()
            .await
            .map_err(|e| creation_error(e.to_string()))?;
        if existing.iter().any(|name| name == collection.as_str()) {
            info!("collection already exists");
            return Ok(CollectionAck::AlreadyExists);
        }

        match self
            .engine
            .create_collection(
                collection.as_str(),
                self.shard_count,
                self.replication_factor,
            )
            .await
        {
            Ok(()) => {
                info!(
                    shards = self.shard_count,
                    replicas = self.replication_factor,
                    "collection created"
                );
                Ok(CollectionAck::Created)
            }
            // Lost a race with another creator.
            Err(e) if e.is_already_exists() => Ok(CollectionAck::AlreadyExists),
            Err(e) => Err(creation_error(e.to_string())),
        }
    }
}
