use super::ErrorResponse;
use crate::AppState;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::warn;

pub const API_ENDPOINT: &str = "/api";

/// Relay the upstream endpoint's response body.
///
/// The upstream is contacted on every request and its body is forwarded
/// verbatim as JSON without being parsed or cached. The upstream's own
/// status code is deliberately not inspected; whatever body it produced is
/// what the client receives.
pub async fn api_handler(State(state): State<AppState>) -> Response {
    let upstream_response = match state
        .client
        .get(state.settings.upstream_url.clone())
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            warn!("Failed to make request to upstream server: {err}");
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    message: "Failed to send request to upstream server.",
                }),
            )
                .into_response();
        }
    };

    match upstream_response.text().await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())],
            body,
        )
            .into_response(),
        Err(err) => {
            warn!("Failed to read response from upstream server: {err}");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    message: "Failed to read response from upstream server.",
                }),
            )
                .into_response()
        }
    }
}
