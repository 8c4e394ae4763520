// serde <-> JsValue through JSON text
// Keeps JS objects out of the typed code; everything crossing is plain JSON.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::error::Result;

pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    let json = serde_json::to_string(value)?;
    Ok(js_sys::JSON::parse(&json)?)
}

/// `undefined` reads as JSON `null`.
pub fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T> {
    if value.is_undefined() || value.is_null() {
        return Ok(serde_json::from_str("null")?);
    }
    let json: String = js_sys::JSON::stringify(value)?.into();
    Ok(serde_json::from_str(&json)?)
}
