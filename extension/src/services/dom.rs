// DOM event plumbing shared by the relay and the popup
// Custom event payloads travel as JSON strings so they survive the
// isolated-world boundary between content script and page.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Event, EventTarget};

use crate::error::{ExtensionError, Result};

/// An event listener that unregisters itself when dropped.
pub struct ListenerHandle {
    target: EventTarget,
    event: String,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

impl ListenerHandle {
    pub fn attach(
        target: &EventTarget,
        event: &str,
        capture: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback_and_bool(
            event,
            callback.as_ref().unchecked_ref(),
            capture,
        )?;
        Ok(Self {
            target: target.clone(),
            event: event.to_string(),
            capture,
            callback,
        })
    }

    /// Listener whose handler only wants the decoded `detail` payload.
    pub fn on_detail<T: DeserializeOwned + 'static>(
        target: &EventTarget,
        event: &str,
        mut handler: impl FnMut(T) + 'static,
    ) -> Result<Self> {
        let name = event.to_string();
        Self::attach(target, event, false, move |ev| match read_detail::<T>(&ev) {
            Ok(detail) => handler(detail),
            Err(e) => log::error!("Bad {} payload: {}", name, e),
        })
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        let removed = self.target.remove_event_listener_with_callback_and_bool(
            &self.event,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        );
        if removed.is_err() {
            log::warn!("Could not remove {} listener", self.event);
        }
    }
}

pub fn dispatch<T: Serialize + ?Sized>(target: &EventTarget, event: &str, detail: &T) -> Result<()> {
    let json = serde_json::to_string(detail)?;
    let init = CustomEventInit::new();
    init.set_detail(&JsValue::from_str(&json));
    let custom = CustomEvent::new_with_event_init_dict(event, &init)?;
    target.dispatch_event(&custom)?;
    Ok(())
}

pub fn read_detail<T: DeserializeOwned>(event: &Event) -> Result<T> {
    let custom = event
        .dyn_ref::<CustomEvent>()
        .ok_or_else(|| ExtensionError::Js(format!("{} is not a CustomEvent", event.type_())))?;
    let json = custom
        .detail()
        .as_string()
        .ok_or_else(|| ExtensionError::Js(format!("{} detail is not a string", event.type_())))?;
    Ok(serde_json::from_str(&json)?)
}
