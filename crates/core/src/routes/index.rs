use super::ErrorResponse;
use crate::AppState;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::warn;

pub const INDEX_ENDPOINT: &str = "/";

/// Serve the configured HTML page.
///
/// The page is read from disk on every request rather than preloaded at
/// startup, so the file on disk is always the source of truth.
pub async fn index_handler(State(state): State<AppState>) -> Response {
    match tokio::fs::read(&state.settings.page_path).await {
        Ok(contents) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime::TEXT_HTML.as_ref())],
            contents,
        )
            .into_response(),
        Err(err) => {
            warn!(
                "Failed to read page file '{}': {err}",
                state.settings.page_path.display()
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    message: "Failed to read the page from disk.",
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{BuildHttpClientArgs, build_http_client};
    use crate::{Settings, UpstreamSettings};
    use std::time::Duration;

    fn state_with_page(page_path: std::path::PathBuf) -> AppState {
        AppState {
            client: build_http_client(BuildHttpClientArgs {
                allow_invalid_certs: false,
                max_redirects: 10,
                request_timeout: Duration::from_secs(10),
            })
            .unwrap(),
            settings: Settings {
                request_timeout: 30,
                page_path,
                upstream_url: url::Url::parse(crate::DEFAULT_UPSTREAM_URL).unwrap(),
                upstream_settings: UpstreamSettings::default(),
            },
        }
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn serves_page_file_verbatim() {
        let page = std::env::temp_dir().join("stripboard-index-verbatim.html");
        std::fs::write(&page, "<h1>Hi</h1>").unwrap();

        let response = index_handler(State(state_with_page(page.clone()))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html"
        );
        assert_eq!(body_bytes(response).await, b"<h1>Hi</h1>");

        std::fs::remove_file(&page).ok();
    }

    #[tokio::test]
    async fn repeated_requests_are_identical_while_file_is_unchanged() {
        let page = std::env::temp_dir().join("stripboard-index-idempotent.html");
        std::fs::write(&page, "<p>stable</p>").unwrap();
        let state = state_with_page(page.clone());

        let first = body_bytes(index_handler(State(state.clone())).await).await;
        let second = body_bytes(index_handler(State(state)).await).await;
        assert_eq!(first, second);

        std::fs::remove_file(&page).ok();
    }

    #[tokio::test]
    async fn picks_up_file_edits_between_requests() {
        let page = std::env::temp_dir().join("stripboard-index-edited.html");
        std::fs::write(&page, "<p>before</p>").unwrap();
        let state = state_with_page(page.clone());

        assert_eq!(
            body_bytes(index_handler(State(state.clone())).await).await,
            b"<p>before</p>"
        );
        std::fs::write(&page, "<p>after</p>").unwrap();
        assert_eq!(
            body_bytes(index_handler(State(state)).await).await,
            b"<p>after</p>"
        );

        std::fs::remove_file(&page).ok();
    }

    #[tokio::test]
    async fn missing_page_file_is_an_internal_error() {
        let page = std::env::temp_dir().join("stripboard-index-does-not-exist.html");
        std::fs::remove_file(&page).ok();

        let response = index_handler(State(state_with_page(page))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
