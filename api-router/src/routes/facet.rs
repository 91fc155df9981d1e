use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use coordinator::FacetRequest;
use serde::Deserialize;
use serde_json::json;

use crate::{api_state::ApiState, error::ApiError, extract::QueryParams};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetParams {
    #[serde(default)]
    pub collection_name: String,
    pub facet_field: Option<String>,
}

pub async fn get_dep_facet(
    State(state): State<ApiState>,
    QueryParams(params): QueryParams<FacetParams>,
) -> Result<impl IntoResponse, ApiError> {
    let facets = state
        .coordinator
        .facet(FacetRequest {
            collection: params.collection_name,
            field: params.facet_field,
        })
        .await?;

    Ok(Json(json!({ "facets": facets })))
}
