use axum::{
    extract::{FromRequest, FromRequestParts, Query},
    Json,
};

use crate::error::ApiError;

/// JSON request body whose rejections answer with the gateway's error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query string parameters whose rejections answer with the gateway's error shape.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);
