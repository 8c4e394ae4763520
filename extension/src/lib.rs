// Pomodoro page popup extension
// One wasm module serves both the content relay (`start_content`) and the
// injected popup (`start_popup`); the service worker uses the `background`
// binary.

use std::sync::Once;

pub mod closer;
pub mod config;
pub mod content;
pub mod error;
pub mod format;
pub mod mount;
pub mod popup;
pub mod protocol;
pub mod relay;
pub mod services;
pub mod settings;
pub mod store;
pub mod timer;
pub mod view;

#[cfg(all(feature = "dioxus", target_arch = "wasm32"))]
mod components;
#[cfg(all(feature = "dioxus", target_arch = "wasm32"))]
pub mod icons;

pub use error::{ExtensionError, Result};

static LOGGING: Once = Once::new();

/// Console logging and readable panics. Every wasm entry point calls this
/// first; repeated calls are no-ops.
pub fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::default());
    });
}
