mod config;

pub use config::IngestionConfig;

use std::{path::PathBuf, sync::Arc, time::Instant};

use common::{
    error::AppError,
    storage::{
        engine::SearchEngine,
        types::{CollectionRef, Record},
    },
};
use tracing::{debug, info};

use crate::{
    submit::BatchSubmitter,
    transform::{RowTransformer, TransformPolicy},
};

/// CSV file in, committed documents out.
#[derive(Clone)]
pub struct IngestionPipeline {
    submitter: BatchSubmitter,
    config: IngestionConfig,
}

impl IngestionPipeline {
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self::new_with_config(engine, IngestionConfig::default())
    }

    pub fn new_with_config(engine: Arc<dyn SearchEngine>, config: IngestionConfig) -> Self {
        Self {
            submitter: BatchSubmitter::new(engine),
            config,
        }
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    /// Builds the transform policy for one request, falling back to configured defaults.
    /// An id field named by the request must exist in the source; the configured one may not.
    pub fn policy(
        &self,
        exclude_column: Option<String>,
        id_field: Option<String>,
    ) -> TransformPolicy {
        let require_id_field = id_field.is_some();
        TransformPolicy {
            exclude_column: exclude_column.or_else(|| self.config.exclude_column.clone()),
            id_field: id_field.or_else(|| self.config.id_field.clone()),
            require_id_field,
            unique_key: self.config.unique_key.clone(),
            on_malformed: self.config.on_malformed,
        }
    }

    fn duration_millis(started: Instant) -> u64 {
        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Reads and transforms the whole source, then submits it as one batch.
    #[tracing::instrument(
        skip_all,
        fields(collection = %collection, source = %source.display())
    )]
    pub async fn index_from_source(
        &self,
        collection: &CollectionRef,
        source: PathBuf,
        policy: TransformPolicy,
    ) -> Result<usize, AppError> {
        let started = Instant::now();

        // File reads block; keep them off the async workers.
        let batch = tokio::task::spawn_blocking(move || -> Result<Vec<Record>, AppError> {
            RowTransformer::from_path(&source, policy)?.collect()
        })
        .await??;

        let transform_ms = Self::duration_millis(started);
        debug!(rows = batch.len(), transform_ms, "source transformed");

        let count = self.submitter.submit(collection, batch).await?;

        info!(
            count,
            total_ms = Self::duration_millis(started),
            transform_ms,
            "source indexed"
        );
        Ok(count)
    }
}
