mod api;
mod index;

pub use api::*;
pub use index::*;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub(crate) message: &'static str,
}

/// Explicit default for any path outside the route table.
pub async fn not_found_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "No route matches the requested path.",
        }),
    )
        .into_response()
}
