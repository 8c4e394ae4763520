// Chrome Storage API Integration
// chrome.storage.local holds the settings record as plain JSON values

use async_trait::async_trait;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::js::{from_js, to_js};
use crate::error::{ExtensionError, Result};
use crate::settings::{SettingKey, Settings};
use crate::store::SettingsStore;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], catch)]
    fn get(keys: JsValue) -> std::result::Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], catch)]
    fn set(items: JsValue) -> std::result::Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "onChanged"], js_name = addListener)]
    fn add_changed_listener(callback: &js_sys::Function);

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "onChanged"], js_name = removeListener)]
    fn remove_changed_listener(callback: &js_sys::Function);
}

/// `chrome.storage.local` as a [`SettingsStore`].
#[derive(Clone, Copy, Default)]
pub struct ChromeStorage;

impl ChromeStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl SettingsStore for ChromeStorage {
    async fn get(&self, keys: &[SettingKey]) -> Result<Settings> {
        let names = js_sys::Array::new();
        for key in keys {
            names.push(&JsValue::from_str(key.as_str()));
        }

        let pending = get(names.into()).map_err(storage_error)?;
        let result = JsFuture::from(pending).await.map_err(storage_error)?;
        from_js(&result)
    }

    async fn set(&self, patch: &Settings) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let pending = set(to_js(patch)?).map_err(storage_error)?;
        JsFuture::from(pending).await.map_err(storage_error)?;
        log::debug!("Stored {:?}", patch);
        Ok(())
    }
}

/// chrome.storage rejects with an `Error` object or a plain message.
fn storage_error(err: JsValue) -> ExtensionError {
    let message = js_sys::Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    ExtensionError::Storage(message)
}

/// Live `storage.onChanged` listener; removed again when dropped.
pub struct StorageSubscription {
    callback: Closure<dyn FnMut(JsValue, JsValue)>,
}

impl StorageSubscription {
    /// `on_change` gets the raw `{key: {oldValue, newValue}}` map of every
    /// change to the `local` area.
    pub fn subscribe(mut on_change: impl FnMut(Map<String, Value>) + 'static) -> Self {
        let callback = Closure::wrap(Box::new(move |changes: JsValue, area: JsValue| {
            if area.as_string().as_deref() != Some("local") {
                return;
            }
            match from_js::<Map<String, Value>>(&changes) {
                Ok(changes) => on_change(changes),
                Err(e) => log::error!("Unreadable storage change: {}", e),
            }
        }) as Box<dyn FnMut(JsValue, JsValue)>);

        add_changed_listener(callback.as_ref().unchecked_ref());
        Self { callback }
    }
}

impl Drop for StorageSubscription {
    fn drop(&mut self) {
        remove_changed_listener(self.callback.as_ref().unchecked_ref());
    }
}
