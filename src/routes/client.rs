use axum::{extract::State, Json};
use executor_portal_core::ClientSettings;

use crate::state::AppState;

/// `GET /ui-config.json`: limits and URLs the browser UI runs with.
pub async fn ui_config(State(state): State<AppState>) -> Json<ClientSettings> {
    Json(state.config.client.clone())
}
