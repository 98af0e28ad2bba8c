use axum::{
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde_json::json;

/// `/api/*` and non-GET requests outside the host's own routes; they belong to
/// the executor backend and must not fall through to `index.html`.
pub async fn unavailable(method: Method, uri: Uri) -> impl IntoResponse {
    tracing::warn!("{} {} ist ein Backend-Endpunkt, hier nicht bedient", method, uri.path());
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "success": false,
            "message": format!("{} {} is handled by the executor backend", method, uri.path()),
        })),
    )
}
