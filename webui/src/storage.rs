use executor_portal_core::persist::{KeyValueStore, StoreError};
use web_sys::console;

/// `window.localStorage` behind the core store trait.
pub struct LocalStore(web_sys::Storage);

impl LocalStore {
    /// None when storage is disabled (private mode, sandboxed frames).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self(storage))
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.get_item(key).map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.set_item(key, value).map_err(|e| StoreError::Write(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.0.remove_item(key).map_err(|e| StoreError::Write(format!("{:?}", e)))
    }
}

pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

pub fn log_store_error(e: StoreError) {
    console::warn_1(&format!("localStorage: {}", e).into());
}
