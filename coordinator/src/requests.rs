use std::path::PathBuf;

use common::storage::types::CollectionRef;
use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct IndexRequest {
    pub collection: String,
    /// Relative to `data_dir`; the configured CSV when absent.
    pub source_path: Option<String>,
    pub exclude_column: Option<String>,
    pub id_field: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub collection: String,
    pub field: String,
    pub value: String,
    pub rows: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct FacetRequest {
    pub collection: String,
    /// Configured `facet_field` when absent.
    pub field: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    pub collection: CollectionRef,
    pub source: PathBuf,
    pub count: usize,
}
