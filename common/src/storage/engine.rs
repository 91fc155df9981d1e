use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::types::{Document, Record};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("engine rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected engine response: {0}")]
    Decode(String),
    #[error("invalid engine url: {0}")]
    Url(#[from] url::ParseError),
}

impl EngineError {
    /// Solr reports duplicate creates with a rejection mentioning "already exists".
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::Rejected { message, .. } if message.contains("already exists"))
    }
}

/// Facet request attached to a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSpec {
    pub field: String,
    pub min_count: u32,
    pub limit: Option<i64>,
}

/// A query in the engine's own syntax, ready to send unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    pub rows: Option<u32>,
    pub facet: Option<FacetSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetBucket {
    pub value: String,
    pub count: u64,
}

/// Engine answer to a `search` call.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub documents: Vec<Document>,
    pub total_found: u64,
    pub facets: HashMap<String, Vec<FacetBucket>>,
}

/// Boundary to the external search engine. The engine owns all index state.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn ping(&self) -> Result<(), EngineError>;

    async fn list_collections(&self) -> Result<Vec<String>, EngineError>;

    async fn create_collection(
        &self,
        name: &str,
        shard_count: u32,
        replication_factor: u32,
    ) -> Result<(), EngineError>;

    async fn add_documents(&self, collection: &str, records: &[Record]) -> Result<(), EngineError>;

    async fn commit(&self, collection: &str) -> Result<(), EngineError>;

    async fn search(
        &self,
        collection: &str,
        query: &SearchQuery,
    ) -> Result<SearchResult, EngineError>;

    /// Removes one document by unique key and makes the removal visible.
    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), EngineError>;
}
