use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::error::AppError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize, Clone)]
pub enum ApiError {
    #[error("Internal server error")]
    InternalError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {message}")]
    NotFound { kind: &'static str, message: String },

    #[error("Unprocessable source: {message}")]
    Unprocessable { kind: &'static str, message: String },

    /// The engine rejected or failed the call. `partial` marks a commit failure
    /// after documents were already sent.
    #[error("Search engine error: {message}")]
    Engine {
        kind: &'static str,
        message: String,
        partial: bool,
    },
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let kind = err.kind();
        match err {
            AppError::Validation(msg) => Self::ValidationError(msg),
            AppError::SourceNotFound { .. }
            | AppError::CollectionNotFound(_)
            | AppError::FacetFieldMissing { .. } => Self::NotFound {
                kind,
                message: err.to_string(),
            },
            AppError::MalformedRow { .. } | AppError::SourceRead(_) => Self::Unprocessable {
                kind,
                message: err.to_string(),
            },
            AppError::IndexingFailure { .. }
            | AppError::CommitFailure { .. }
            | AppError::QueryError { .. }
            | AppError::CollectionCreationError { .. }
            | AppError::DeletionError { .. }
            | AppError::EngineUnavailable(_) => Self::Engine {
                kind,
                partial: err.is_partial(),
                message: err.to_string(),
            },
            _ => {
                tracing::error!("Internal error: {:?}", err);
                Self::InternalError("Internal server error".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationError(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::ValidationError(rejection.body_text())
    }
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            Self::InternalError(_) => "internal",
            Self::ValidationError(_) => "validation",
            Self::NotFound { kind, .. }
            | Self::Unprocessable { kind, .. }
            | Self::Engine { kind, .. } => *kind,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, error, outcome) = match self {
            Self::InternalError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, "error")
            }
            Self::ValidationError(message) => (StatusCode::BAD_REQUEST, message, "error"),
            Self::NotFound { message, .. } => (StatusCode::NOT_FOUND, message, "error"),
            Self::Unprocessable { message, .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, "error")
            }
            Self::Engine {
                message, partial, ..
            } => (
                StatusCode::BAD_GATEWAY,
                message,
                if partial { "partial" } else { "error" },
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error,
                kind,
                status: outcome,
            }),
        )
            .into_response()
    }
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
    status: &'static str,
}
