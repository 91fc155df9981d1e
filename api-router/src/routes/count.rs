use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{api_state::ApiState, error::ApiError, extract::QueryParams};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountParams {
    #[serde(default)]
    pub collection_name: String,
}

pub async fn get_emp_count(
    State(state): State<ApiState>,
    QueryParams(params): QueryParams<CountParams>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.coordinator.count(&params.collection_name).await?;

    Ok(Json(json!({ "count": count })))
}
