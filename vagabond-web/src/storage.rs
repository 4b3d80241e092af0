//! Browser `localStorage` adapter for the planner's draft persistence.

use vagabond_trip::DraftStore;
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Key/value store backed by `window.localStorage`.
///
/// Stateless; every call re-acquires the storage handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebDraftStore;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("localStorage unavailable")]
    Unavailable,
    #[error("storage operation failed: {0}")]
    Backend(String),
}

fn local_storage() -> Result<Storage, WebStorageError> {
    web_sys::window()
        .and_then(|win| win.local_storage().ok().flatten())
        .ok_or(WebStorageError::Unavailable)
}

fn describe(err: JsValue) -> WebStorageError {
    WebStorageError::Backend(format!("{err:?}"))
}

impl DraftStore for WebDraftStore {
    type Error = WebStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        local_storage()?.get_item(key).map_err(describe)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        local_storage()?.set_item(key, value).map_err(describe)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        local_storage()?.remove_item(key).map_err(describe)
    }
}
