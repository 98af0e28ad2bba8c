use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::allow_list::{AllowList, DEFAULT_EXTENSIONS};

pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Client-side limits and URLs. The host publishes these at `/ui-config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Upper bound per uploaded file in bytes.
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
    pub search_debounce_ms: u32,
    /// Saved form state older than this is dropped on load. `0` keeps it forever.
    pub state_max_age_hours: u32,
    pub submit_url: String,
    pub lookup_url: String,
    pub toast_ms: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            search_debounce_ms: 300,
            state_max_age_hours: 24,
            submit_url: "/".to_string(),
            lookup_url: "/lookup_last_type".to_string(),
            toast_ms: 5000,
        }
    }
}

impl ClientSettings {
    pub fn default_allow_list(&self) -> AllowList {
        AllowList::from_extensions(&self.allowed_extensions)
    }

    pub fn state_max_age(&self) -> Option<Duration> {
        match self.state_max_age_hours {
            0 => None,
            h => Some(Duration::from_secs(u64::from(h) * 3600)),
        }
    }
}
