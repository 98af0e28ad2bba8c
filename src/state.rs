use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::AppConfig;

/// Shared state of the host. Cheap to clone; handed to every handler by axum.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Root of the served UI bundle.
    pub ui_root: PathBuf,
    /// `index.html` of the bundle; SPA fallback target and readiness check.
    pub ui_index: PathBuf,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let (ui_root, ui_index) = config.ui_paths();
        Self { config: Arc::new(config), ui_root, ui_index, started_at: Utc::now() }
    }
}
