//! The fallback handler for unknown routes.

use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::ErrorBody;

/// Respond with 404 Not Found and a JSON error body.
pub async fn get_404_not_found(uri: Uri) -> Response {
    tracing::debug!("no route for {uri}");

    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("no route for {}", uri.path()),
        }),
    )
        .into_response()
}
