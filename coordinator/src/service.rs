use std::{path::Path, sync::Arc};

use common::{
    error::AppError,
    storage::{
        collections::CollectionManager,
        engine::{FacetBucket, SearchEngine},
        types::{CollectionAck, CollectionRef, Document},
    },
    utils::config::AppConfig,
};
use ingestion_pipeline::{IngestionConfig, IngestionPipeline};
use retrieval_pipeline::{RetrievalConfig, RetrievalPipeline};
use tracing::info;

use crate::{
    flow::handle,
    requests::{FacetRequest, IndexRequest, IndexSummary, SearchRequest},
    source::resolve_source,
};

/// Entry point for every gateway operation. Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct Coordinator {
    engine: Arc<dyn SearchEngine>,
    config: Arc<AppConfig>,
    collections: CollectionManager,
    ingestion: IngestionPipeline,
    retrieval: RetrievalPipeline,
}

impl Coordinator {
    pub fn new(engine: Arc<dyn SearchEngine>, config: AppConfig) -> Self {
        let collections = CollectionManager::new(
            Arc::clone(&engine),
            config.shard_count,
            config.replication_factor,
        );
        let ingestion =
            IngestionPipeline::new_with_config(Arc::clone(&engine), IngestionConfig::from(&config));
        let retrieval = RetrievalPipeline::new(Arc::clone(&engine), RetrievalConfig::from(&config));

        Self {
            engine,
            config: Arc::new(config),
            collections,
            ingestion,
            retrieval,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parses a collection name, using `default_collection` when the name is blank.
    fn collection(&self, name: &str) -> Result<CollectionRef, AppError> {
        match self.config.default_collection.as_deref() {
            Some(default) if name.trim().is_empty() => CollectionRef::parse(default),
            _ => CollectionRef::parse(name),
        }
    }

    /// Engine failures during the existence check are reported with the calling operation's kind.
    async fn existing_collection(
        &self,
        name: &str,
        engine_failure: impl FnOnce(&CollectionRef, String) -> AppError,
    ) -> Result<CollectionRef, AppError> {
        let collection = self.collection(name)?;
        if self.config.verify_collections {
            match self.collections.ensure_exists(&collection).await {
                Err(AppError::EngineUnavailable(message)) => {
                    return Err(engine_failure(&collection, message));
                }
                checked => checked?,
            }
        }
        Ok(collection)
    }

    pub async fn create_collection(
        &self,
        name: &str,
    ) -> Result<(CollectionRef, CollectionAck), AppError> {
        handle(
            "create_collection",
            async move { self.collection(name) },
            |collection| async move {
                let ack = self.collections.create(&collection).await?;
                Ok((collection, ack))
            },
        )
        .await
    }

    pub async fn index_from_source(
        &self,
        request: IndexRequest,
    ) -> Result<IndexSummary, AppError> {
        handle(
            "index_from_source",
            async move {
                let collection = self
                    .existing_collection(&request.collection, indexing_failure)
                    .await?;
                let source = resolve_source(
                    Path::new(&self.config.data_dir),
                    &self.config.csv_path,
                    request.source_path.as_deref(),
                )?;
                let policy = self
                    .ingestion
                    .policy(request.exclude_column, request.id_field);
                Ok((collection, source, policy))
            },
            |(collection, source, policy)| async move {
                let count = self
                    .ingestion
                    .index_from_source(&collection, source.clone(), policy)
                    .await?;
                info!(collection = %collection, count, "indexing completed");
                Ok(IndexSummary {
                    collection,
                    source,
                    count,
                })
            },
        )
        .await
    }

    pub async fn search(&self, request: SearchRequest) -> Result<Vec<Document>, AppError> {
        handle(
            "search",
            async move {
                if request.field.trim().is_empty() || request.value.trim().is_empty() {
                    return Err(AppError::Validation(
                        "column name and value are required".to_string(),
                    ));
                }
                let collection = self
                    .existing_collection(&request.collection, query_failure)
                    .await?;
                Ok((collection, request))
            },
            |(collection, request)| async move {
                self.retrieval
                    .search(&collection, &request.field, &request.value, request.rows)
                    .await
            },
        )
        .await
    }

    pub async fn count(&self, name: &str) -> Result<u64, AppError> {
        handle(
            "count",
            self.existing_collection(name, query_failure),
            |collection| async move { self.retrieval.count(&collection).await },
        )
        .await
    }

    /// Deleting an id that is not present still succeeds.
    pub async fn delete_by_id(&self, name: &str, id: &str) -> Result<(), AppError> {
        handle(
            "delete_by_id",
            async move {
                let id = id.trim();
                if id.is_empty() {
                    return Err(AppError::Validation("employee id is required".to_string()));
                }
                let collection = self
                    .existing_collection(name, |collection, message| AppError::DeletionError {
                        collection: collection.to_string(),
                        id: id.to_string(),
                        message,
                    })
                    .await?;
                Ok((collection, id))
            },
            |(collection, id)| async move {
                self.engine
                    .delete_by_id(collection.as_str(), id)
                    .await
                    .map_err(|e| AppError::DeletionError {
                        collection: collection.to_string(),
                        id: id.to_string(),
                        message: e.to_string(),
                    })?;
                info!(collection = %collection, id, "document deleted");
                Ok(())
            },
        )
        .await
    }

    pub async fn facet(&self, request: FacetRequest) -> Result<Vec<FacetBucket>, AppError> {
        handle(
            "facet",
            async move {
                let field = request
                    .field
                    .filter(|f| !f.trim().is_empty())
                    .unwrap_or_else(|| self.config.facet_field.clone());
                let collection = self
                    .existing_collection(&request.collection, query_failure)
                    .await?;
                Ok((collection, field))
            },
            |(collection, field)| async move { self.retrieval.facet(&collection, &field).await },
        )
        .await
    }

    /// Readiness probe against the engine.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.engine
            .ping()
            .await
            .map_err(|e| AppError::EngineUnavailable(e.to_string()))
    }
}

fn indexing_failure(collection: &CollectionRef, message: String) -> AppError {
    AppError::IndexingFailure {
        collection: collection.to_string(),
        message,
    }
}

fn query_failure(collection: &CollectionRef, message: String) -> AppError {
    AppError::QueryError {
        collection: collection.to_string(),
        message,
    }
}
