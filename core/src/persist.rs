//! Form state kept in browser local storage across reloads.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::selection::InputMethod;

pub const STORAGE_KEY: &str = "formState";

/// Result page: whether the table section is expanded (`"true"`/`"false"`).
pub const TABLE_VISIBLE_KEY: &str = "tableVisible";

/// Stored JSON; field names match what earlier page versions wrote.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedFormState {
    #[serde(default)]
    pub selected_operation: String,
    #[serde(default)]
    pub selected_function: String,
    #[serde(default)]
    pub input_method: InputMethod,
    #[serde(default = "default_show_table")]
    pub show_table: bool,
    /// Epoch milliseconds of the write.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

fn default_show_table() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write failed: {0}")]
    Write(String),
}

/// String key/value storage. `web_sys::Storage` in the browser, [`MemoryStore`] in tests.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

pub fn save<S: KeyValueStore + ?Sized>(store: &S, state: &PersistedFormState) -> Result<(), StoreError> {
    let json = serde_json::to_string(state).map_err(|e| StoreError::Write(e.to_string()))?;
    store.set(STORAGE_KEY, &json)
}

/// Reads the saved state. Corrupt records and records older than `max_age` are
/// removed from the store and read as `None`.
pub fn load<S: KeyValueStore + ?Sized>(store: &S, now_ms: i64, max_age: Option<Duration>) -> Option<PersistedFormState> {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "cannot read saved form state");
            return None;
        }
    };
    let state: PersistedFormState = match serde_json::from_str(&raw) {
        Ok(state) => state,
        Err(e) => {
            debug!(error = %e, "discarding corrupt form state");
            discard(store);
            return None;
        }
    };
    if let (Some(max_age), Some(ts)) = (max_age, state.timestamp) {
        let age_ms = now_ms.saturating_sub(ts);
        if age_ms > max_age.as_millis() as i64 {
            debug!(age_ms, "discarding stale form state");
            discard(store);
            return None;
        }
    }
    Some(state)
}

/// Table visibility on the result page; anything but `"false"` reads as visible.
pub fn load_table_visible<S: KeyValueStore + ?Sized>(store: &S) -> bool {
    !matches!(store.get(TABLE_VISIBLE_KEY), Ok(Some(v)) if v == "false")
}

pub fn save_table_visible<S: KeyValueStore + ?Sized>(store: &S, visible: bool) -> Result<(), StoreError> {
    store.set(TABLE_VISIBLE_KEY, if visible { "true" } else { "false" })
}

fn discard<S: KeyValueStore + ?Sized>(store: &S) {
    if let Err(e) = store.remove(STORAGE_KEY) {
        warn!(error = %e, "cannot remove saved form state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;

    fn sample(ts: i64) -> PersistedFormState {
        PersistedFormState {
            selected_operation: "WB".into(),
            selected_function: "WB_AUTO_UPH".into(),
            input_method: InputMethod::Folder,
            show_table: false,
            timestamp: Some(ts),
        }
    }

    #[test]
    fn writes_camel_case_fields() {
        let store = MemoryStore::new();
        save(&store, &sample(5)).unwrap();
        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"selectedOperation\":\"WB\""));
        assert!(raw.contains("\"inputMethod\":\"folder\""));
        assert!(raw.contains("\"showTable\":false"));
    }

    #[test]
    fn fresh_state_is_returned() {
        let store = MemoryStore::new();
        save(&store, &sample(0)).unwrap();
        let loaded = load(&store, HOUR_MS, Some(Duration::from_secs(86_400)));
        assert_eq!(loaded, Some(sample(0)));
    }

    #[test]
    fn stale_state_is_removed() {
        let store = MemoryStore::new();
        save(&store, &sample(0)).unwrap();
        assert_eq!(load(&store, 25 * HOUR_MS, Some(Duration::from_secs(86_400))), None);
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn disabled_eviction_keeps_old_state() {
        let store = MemoryStore::new();
        save(&store, &sample(0)).unwrap();
        assert!(load(&store, 1000 * HOUR_MS, None).is_some());
    }

    #[test]
    fn corrupt_state_is_removed() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        assert_eq!(load(&store, 0, None), None);
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn table_visibility_defaults_to_shown() {
        let store = MemoryStore::new();
        assert!(load_table_visible(&store));
        save_table_visible(&store, false).unwrap();
        assert!(!load_table_visible(&store));
    }

    #[test]
    fn older_records_without_timestamp_still_load() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"selectedOperation":"DA","selectedFunction":"","inputMethod":"upload"}"#).unwrap();
        let loaded = load(&store, 0, Some(Duration::from_secs(3600))).unwrap();
        assert_eq!(loaded.selected_operation, "DA");
        assert!(loaded.show_table);
    }
}
