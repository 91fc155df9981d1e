use std::sync::Arc;

use common::{
    error::AppError,
    storage::{
        engine::SearchEngine,
        types::{CollectionRef, Record},
    },
};
use tracing::{error, info, instrument};

/// Sends a whole batch to the engine, then commits it.
#[derive(Clone)]
pub struct BatchSubmitter {
    engine: Arc<dyn SearchEngine>,
}

impl BatchSubmitter {
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self { engine }
    }

    #[instrument(skip_all, fields(collection = %collection, documents = batch.len()))]
    pub async fn submit(
        &self,
        collection: &CollectionRef,
        batch: Vec<Record>,
    ) -> Result<usize, AppError> {
        if batch.is_empty() {
            info!("empty batch, nothing sent");
            return Ok(0);
        }

        self.engine
            .add_documents(collection.as_str(), &batch)
            .await
            .map_err(|e| {
                error!(error = %e, "add failed, nothing committed");
                AppError::indexing(collection.as_str(), &e)
            })?;

        self.engine.commit(collection.as_str()).await.map_err(|e| {
            error!(error = %e, "commit failed after add, index state indeterminate");
            AppError::CommitFailure {
                collection: collection.to_string(),
                submitted: batch.len(),
                message: e.to_string(),
            }
        })?;

        info!("batch committed");
        Ok(batch.len())
    }
}
