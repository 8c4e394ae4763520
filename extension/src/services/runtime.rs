// chrome.runtime: resource URLs and messages to the service worker

use async_trait::async_trait;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::js::{from_js, to_js};
use crate::error::Result;
use crate::protocol::Request;
use crate::relay::Background;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = sendMessage, catch)]
    fn send_message(message: JsValue) -> std::result::Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = getURL)]
    fn get_url(path: &str) -> String;
}

/// Absolute URL of a file packaged with the extension.
pub fn resource_url(path: &str) -> String {
    get_url(path)
}

/// The background service worker, reached through `runtime.sendMessage`.
#[derive(Clone, Copy, Default)]
pub struct ChromeBackground;

#[async_trait(?Send)]
impl Background for ChromeBackground {
    async fn send(&self, request: &Request) -> Result<Value> {
        log::debug!("Forwarding {} to background", request.action());
        let reply = JsFuture::from(send_message(to_js(request)?)?).await?;
        from_js(&reply)
    }
}
