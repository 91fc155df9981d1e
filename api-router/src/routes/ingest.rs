use axum::{extract::State, response::IntoResponse, Json};
use coordinator::IndexRequest;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{api_state::ApiState, error::ApiError, extract::JsonBody};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexParams {
    #[serde(default)]
    pub collection_name: String,
    pub exclude_column: Option<String>,
    pub source_path: Option<String>,
    pub id_field: Option<String>,
}

pub async fn index_data_from_csv(
    State(state): State<ApiState>,
    JsonBody(input): JsonBody<IndexParams>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        collection = %input.collection_name,
        exclude_column = ?input.exclude_column,
        has_source_path = input.source_path.is_some(),
        "Received indexing request"
    );

    let summary = state
        .coordinator
        .index_from_source(IndexRequest {
            collection: input.collection_name,
            source_path: input.source_path,
            exclude_column: input.exclude_column,
            id_field: input.id_field,
        })
        .await?;

    Ok(Json(json!({
        "message": "Data indexed successfully from CSV",
        "collection": summary.collection,
        "count": summary.count,
    })))
}
