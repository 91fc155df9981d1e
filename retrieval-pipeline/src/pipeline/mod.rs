mod config;

pub use config::RetrievalConfig;

use std::sync::Arc;

use common::{
    error::AppError,
    storage::{
        engine::{FacetBucket, SearchEngine, SearchQuery, SearchResult},
        types::{CollectionRef, Document},
    },
};
use tracing::{debug, instrument};

use crate::{mapper, query};

/// Query side of the gateway: builds a query, runs it, maps the answer.
#[derive(Clone)]
pub struct RetrievalPipeline {
    engine: Arc<dyn SearchEngine>,
    config: RetrievalConfig,
}

impl RetrievalPipeline {
    pub fn new(engine: Arc<dyn SearchEngine>, config: RetrievalConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    async fn run(
        &self,
        collection: &CollectionRef,
        query: &SearchQuery,
    ) -> Result<SearchResult, AppError> {
        debug!(collection = %collection, q = %query.q, rows = ?query.rows, "running query");
        self.engine
            .search(collection.as_str(), query)
            .await
            .map_err(|e| AppError::query(collection.as_str(), &e))
    }

    #[instrument(skip_all, fields(collection = %collection))]
    pub async fn search(
        &self,
        collection: &CollectionRef,
        field: &str,
        value: &str,
        rows: Option<u32>,
    ) -> Result<Vec<Document>, AppError> {
        let rows = rows.unwrap_or(self.config.default_rows);
        let query = query::field_match(field, value, Some(rows))?;
        let result = self.run(collection, &query).await?;
        debug!(
            total_found = result.total_found,
            returned = result.documents.len(),
            "search finished"
        );
        Ok(mapper::documents(result))
    }

    #[instrument(skip_all, fields(collection = %collection))]
    pub async fn count(&self, collection: &CollectionRef) -> Result<u64, AppError> {
        let result = self.run(collection, &query::count()).await?;
        Ok(mapper::count(&result))
    }

    #[instrument(skip_all, fields(collection = %collection))]
    pub async fn facet(
        &self,
        collection: &CollectionRef,
        field: &str,
    ) -> Result<Vec<FacetBucket>, AppError> {
        let query = query::facet(field, self.config.facet_min_count, self.config.facet_limit)?;
        let result = self.run(collection, &query).await?;
        mapper::facet(result, collection, field.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::storage::{
        memory::{EngineOp, InMemoryEngine},
        types::Record,
    };

    async fn seeded() -> (Arc<InMemoryEngine>, RetrievalPipeline, CollectionRef) {
        let engine = Arc::new(InMemoryEngine::new());
        engine.create_collection("emp", 1, 1).await.expect("create");
        let rows = [
            ("E02002", "IT", "Male"),
            ("E02003", "HR", "Male"),
            ("E02004", "IT", "Male"),
            ("E02005", "IT", "Female"),
        ];
        let records: Vec<Record> = rows
            .iter()
            .map(|(id, dept, gender)| {
                [("id", *id), ("Department", *dept), ("Gender", *gender)]
                    .into_iter()
                    .collect()
            })
            .collect();
        engine.add_documents("emp", &records).await.expect("add");
        engine.commit("emp").await.expect("commit");

        let pipeline = RetrievalPipeline::new(engine.clone(), RetrievalConfig::default());
        (engine, pipeline, CollectionRef::parse("emp").expect("name"))
    }

    #[tokio::test]
    async fn field_match_returns_only_exact_matches() {
        let (_engine, pipeline, emp) = seeded().await;

        let docs = pipeline.search(&emp, "Department", "IT", None).await.expect("search");
        assert_eq!(docs.len(), 3);
        assert!(docs.iter().all(|d| d["Department"] == "IT"));

        let none = pipeline.search(&emp, "Department", "I", None).await.expect("search");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn rows_limit_caps_documents() {
        let (_engine, pipeline, emp) = seeded().await;
        let docs = pipeline.search(&emp, "Gender", "Male", Some(1)).await.expect("search");
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn count_and_facet() {
        let (_engine, pipeline, emp) = seeded().await;
        assert_eq!(pipeline.count(&emp).await.expect("count"), 4);

        let buckets = pipeline.facet(&emp, "Department").await.expect("facet");
        let mut pairs: Vec<(String, u64)> =
            buckets.into_iter().map(|b| (b.value, b.count)).collect();
        pairs.sort();
        assert_eq!(pairs, vec![("HR".to_string(), 1), ("IT".to_string(), 3)]);
    }

    #[tokio::test]
    async fn engine_failures_are_query_errors() {
        let (engine, pipeline, emp) = seeded().await;
        engine.fail_on(EngineOp::Search);

        let err = pipeline.count(&emp).await.expect_err("search should fail");
        assert!(matches!(err, AppError::QueryError { ref collection, .. } if collection == "emp"));
    }
}
