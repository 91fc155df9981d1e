use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::{api_state::ApiState, error::ApiError, extract::JsonBody};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    #[serde(default)]
    pub collection_name: String,
    #[serde(default)]
    pub employee_id: String,
}

pub async fn del_emp_by_id(
    State(state): State<ApiState>,
    JsonBody(input): JsonBody<DeleteParams>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .coordinator
        .delete_by_id(&input.collection_name, &input.employee_id)
        .await?;

    Ok(Json(json!({
        "message": format!("Employee with ID {} deleted", input.employee_id.trim())
    })))
}
