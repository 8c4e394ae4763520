// Crate-wide error type
// JS exceptions are folded in at the binding boundary

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::settings::SettingKey;

#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("JS error: {0}")]
    Js(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("background error: {0}")]
    Background(String),

    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown setting key: {0}")]
    UnknownKey(String),

    #[error("setting {0} cannot be adjusted")]
    NotAdjustable(SettingKey),

    #[error("invalid value {value} for {key}")]
    InvalidValue { key: SettingKey, value: i64 },

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("popup is not mounted")]
    NotMounted,
}

pub type Result<T> = std::result::Result<T, ExtensionError>;

impl From<JsValue> for ExtensionError {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => ExtensionError::Js(message),
            None => ExtensionError::Js(format!("{:?}", value)),
        }
    }
}

impl From<ExtensionError> for JsValue {
    fn from(err: ExtensionError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
