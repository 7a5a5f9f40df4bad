use axum::{
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde_json::json;

/// Catch-all for unknown paths and for known paths hit with an unsupported
/// method.
pub async fn unmatched_request(method: Method, uri: Uri) -> impl IntoResponse {
    tracing::warn!(method = %method, path = %uri.path(), "Unmatched request");
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
