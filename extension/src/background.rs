// Background service worker logic for the Pomodoro extension
// Minimal dependencies - no Dioxus, works with --target no-modules
// All business logic in Rust, JavaScript is just glue to Chrome APIs

use pomodoro_extension::protocol::{Request, Response};
use pomodoro_extension::services::js::{from_js, to_js};
use pomodoro_extension::services::ChromeStorage;
use pomodoro_extension::store;
use pomodoro_extension::timer::TimerService;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

// Dummy main for binary target
fn main() {}

/// Initialize background service worker
/// Called from JavaScript glue via wasm_bindgen
#[wasm_bindgen]
pub fn init_background() {
    pomodoro_extension::init_logging();
    log::info!("Pomodoro background service initialized");
}

/// Handle extension installation: store defaults for anything missing
#[wasm_bindgen]
pub fn handle_install() -> js_sys::Promise {
    future_to_promise(async {
        match store::seed_defaults(&ChromeStorage::new()).await {
            Ok(written) if written.is_empty() => log::info!("Extension updated, settings kept"),
            Ok(written) => log::info!("Extension installed, defaults stored: {:?}", written),
            Err(e) => log::error!("Failed to store defaults: {}", e),
        }
        Ok(JsValue::UNDEFINED)
    })
}

/// Handle a message relayed by a content script.
/// The promise resolves to the response object the glue passes to
/// `sendResponse`.
#[wasm_bindgen]
pub fn handle_message(message: JsValue) -> js_sys::Promise {
    future_to_promise(async move {
        let response = match from_js::<Request>(&message) {
            Ok(request) => {
                log::debug!("Received {}", request.action());
                TimerService::new(ChromeStorage::new()).handle(request).await
            }
            Err(e) => {
                log::warn!("Ignoring unrecognised message: {}", e);
                Response::error(e)
            }
        };
        Ok(to_js(&response)?)
    })
}
