//! # Executor Portal Host
//!
//! A small axum server in front of the browser UI of the Python executor. It
//! serves the compiled Dioxus bundle with an SPA fallback and publishes the
//! client settings the UI validates uploads against. The processing endpoints
//! (`/api/*` and the form target) belong to the executor backend; the host
//! answers them with `502` instead of the SPA page.
//!
//! ## Core Components
//!
//! - [`config`]: Layered configuration (embedded TOML, local file, environment)
//! - [`middleware`]: Security and cache headers
//! - [`routes`]: Probes and `/ui-config.json`
//! - [`state`]: Shared application state

pub mod config;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware::from_fn_with_state;
use axum::{
    routing::{any, get, get_service},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use state::AppState;

/// Full router: probes, client settings and the static UI with SPA fallback.
/// `/api/*` and non-GET requests never reach the fallback.
pub fn build_app(state: AppState) -> Router {
    let static_ui = ServeDir::new(&state.ui_root)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(&state.ui_index));
    // Only GET/HEAD reach the bundle; form posts and other methods go to the backend handler
    let static_ui_service = get_service(static_ui).fallback(routes::backend::unavailable);
    let cfg_arc = state.config.clone();

    let app = Router::new()
        .route("/healthz", get(routes::health::healthz))
        .route("/readyz", get(routes::health::readyz))
        .route("/version", get(routes::health::version))
        .route("/ui-config.json", get(routes::client::ui_config))
        .route("/api", any(routes::backend::unavailable))
        .route("/api/{*rest}", any(routes::backend::unavailable))
        .fallback_service(static_ui_service)
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg_arc, middleware::security_headers::security_headers_middleware));

    // CORS: permissive in debug (UI dev server on another port), same-origin in release
    if cfg!(debug_assertions) {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
