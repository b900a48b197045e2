use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

pub mod routes;
pub mod status;
pub mod views;

pub use routes::*;
pub use status::*;

/// Envelope for single-object responses
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error response with a JSON `{ "error": message }` body
pub fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
