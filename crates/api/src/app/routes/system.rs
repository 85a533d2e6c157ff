use axum::http::StatusCode;

use crate::app::errors::{self, ApiResult};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn root() -> ApiResult {
    Ok(errors::message(StatusCode::OK, "Server is running."))
}

pub async fn not_found() -> ApiResult {
    Ok(errors::message(StatusCode::NOT_FOUND, "Route doesn't found"))
}
