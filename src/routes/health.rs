use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

// Health check endpoint - lightweight
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: the UI bundle must be present to serve anything useful
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match tokio::fs::metadata(&state.ui_index).await {
        Ok(meta) if meta.is_file() => (StatusCode::OK, "ready".to_string()),
        Ok(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: ui index is not a file".to_string()),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)),
    }
}

// Version/Build info endpoint (JSON)
pub async fn version(State(state): State<AppState>) -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        },
        "started_at": state.started_at.to_rfc3339(),
    });
    (StatusCode::OK, Json(body))
}
