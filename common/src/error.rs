use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinError;

use crate::storage::engine::EngineError;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Source not found: {path}: {source}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error reading source: {0}")]
    SourceRead(String),
    #[error("Malformed row at line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("Error indexing data into '{collection}': {message}")]
    IndexingFailure { collection: String, message: String },
    #[error(
        "Commit failed for '{collection}' after {submitted} documents were sent; index state is indeterminate: {message}"
    )]
    CommitFailure {
        collection: String,
        submitted: usize,
        message: String,
    },
    #[error("Search error on '{collection}': {message}")]
    QueryError { collection: String, message: String },
    #[error("Facet field '{field}' missing from response for '{collection}'")]
    FacetFieldMissing { collection: String, field: String },
    #[error("Error creating collection '{collection}': {message}")]
    CollectionCreationError { collection: String, message: String },
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    #[error("Error deleting '{id}' from '{collection}': {message}")]
    DeletionError {
        collection: String,
        id: String,
        message: String,
    },
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Task join error: {0}")]
    Join(#[from] JoinError),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => "source_not_found",
            Self::SourceRead(_) => "source_read",
            Self::MalformedRow { .. } => "malformed_row",
            Self::IndexingFailure { .. } => "indexing_failure",
            Self::CommitFailure { .. } => "commit_failure",
            Self::QueryError { .. } => "query_error",
            Self::FacetFieldMissing { .. } => "facet_field_missing",
            Self::CollectionCreationError { .. } => "collection_creation_error",
            Self::CollectionNotFound(_) => "collection_not_found",
            Self::DeletionError { .. } => "deletion_error",
            Self::EngineUnavailable(_) => "engine_unavailable",
            Self::Validation(_) => "validation",
            Self::Config(_) => "config",
            Self::Join(_) => "join",
            Self::Io(_) => "io",
            Self::InternalError(_) => "internal",
        }
    }

    /// True when the engine may already hold some of the effects of the failed operation.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::CommitFailure { .. })
    }

    pub fn indexing(collection: &str, err: &EngineError) -> Self {
        Self::IndexingFailure {
            collection: collection.to_string(),
            message: err.to_string(),
        }
    }

    pub fn query(collection: &str, err: &EngineError) -> Self {
        Self::QueryError {
            collection: collection.to_string(),
            message: err.to_string(),
        }
    }
}
