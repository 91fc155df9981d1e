use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use coordinator::SearchRequest;
use serde::Deserialize;
use serde_json::json;

use crate::{api_state::ApiState, error::ApiError, extract::QueryParams};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub collection_name: String,
    #[serde(default)]
    pub column_name: String,
    #[serde(default)]
    pub column_value: String,
    pub rows: Option<u32>,
}

pub async fn search_by_column(
    State(state): State<ApiState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let results = state
        .coordinator
        .search(SearchRequest {
            collection: params.collection_name,
            field: params.column_name,
            value: params.column_value,
            rows: params.rows,
        })
        .await?;

    Ok(Json(json!({ "results": results })))
}
