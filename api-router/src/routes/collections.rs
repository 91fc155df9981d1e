use axum::{extract::State, response::IntoResponse, Json};
use common::storage::types::CollectionAck;
use serde::Deserialize;
use serde_json::json;

use crate::{api_state::ApiState, error::ApiError, extract::JsonBody};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionParams {
    #[serde(default)]
    pub collection_name: String,
}

pub async fn create_collection(
    State(state): State<ApiState>,
    JsonBody(input): JsonBody<CreateCollectionParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (collection, ack) = state
        .coordinator
        .create_collection(&input.collection_name)
        .await?;

    let message = match ack {
        CollectionAck::Created => format!("Collection {collection} created successfully"),
        CollectionAck::AlreadyExists => format!("Collection {collection} already exists"),
    };

    Ok(Json(json!({ "message": message, "status": ack })))
}
