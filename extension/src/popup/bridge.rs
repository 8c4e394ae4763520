// Popup side of the custom-event channel to the content relay

use futures::channel::mpsc::UnboundedSender;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::EventTarget;

use super::controller::PopupEvent;
use crate::error::{ExtensionError, Result};
use crate::protocol::{signal, Envelope, ReadySignal};
use crate::services::dom::{self, ListenerHandle};

pub struct Bridge {
    container: EventTarget,
    _listeners: Vec<ListenerHandle>,
}

impl Bridge {
    /// Listen on the popup container; every relay event goes into `events`.
    pub fn connect(container_id: &str, events: UnboundedSender<PopupEvent>) -> Result<Self> {
        let container: EventTarget = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(container_id))
            .ok_or(ExtensionError::NotMounted)?
            .unchecked_into();

        let listeners = vec![
            forward(&container, signal::INITIAL_SETTINGS, &events, PopupEvent::Initial)?,
            forward(&container, signal::STORAGE_UPDATE, &events, PopupEvent::Update)?,
            forward(&container, signal::RELAY_RESPONSE, &events, PopupEvent::Reply)?,
        ];

        Ok(Self {
            container,
            _listeners: listeners,
        })
    }

    pub fn ready(&self, ready: &ReadySignal) {
        if let Err(e) = dom::dispatch(&self.container, signal::POPUP_READY, ready) {
            log::error!("Failed to announce popup: {}", e);
        }
    }

    pub fn send(&self, envelope: &Envelope) {
        log::debug!("-> {} #{}", envelope.request.action(), envelope.id);
        if let Err(e) = dom::dispatch(&self.container, signal::POPUP_REQUEST, envelope) {
            log::error!("Failed to send {}: {}", envelope.request.action(), e);
        }
    }
}

fn forward<T: DeserializeOwned + 'static>(
    container: &EventTarget,
    event: &'static str,
    events: &UnboundedSender<PopupEvent>,
    wrap: fn(T) -> PopupEvent,
) -> Result<ListenerHandle> {
    let events = events.clone();
    ListenerHandle::on_detail(container, event, move |payload: T| {
        if events.unbounded_send(wrap(payload)).is_err() {
            log::debug!("Popup closed, dropping {}", event);
        }
    })
}
