// Popup context shared with every view through the Dioxus context API
// One per popup lifetime: the controller plus the relay connection.

use std::rc::Rc;

use dioxus::prelude::*;

use super::bridge::Bridge;
use super::controller::{PopupController, PopupEvent};
use crate::protocol::Envelope;
use crate::view::Nav;

#[derive(Clone, Copy)]
pub struct PopupContext {
    pub controller: Signal<PopupController>,
    bridge: Signal<Option<Rc<Bridge>>>,
}

impl PopupContext {
    pub fn new() -> Self {
        Self {
            controller: Signal::new(PopupController::new()),
            bridge: Signal::new(None),
        }
    }

    /// Store the connection and ask the relay for the initial settings.
    pub fn connect(&self, bridge: Bridge) {
        bridge.ready(&self.controller.peek().ready_signal());
        let mut slot = self.bridge;
        slot.set(Some(Rc::new(bridge)));
    }

    pub fn apply(&self, event: PopupEvent) {
        let mut controller = self.controller;
        let follow_up = controller.write().apply(event);
        self.send(follow_up);
    }

    pub fn toggle(&self) {
        let mut controller = self.controller;
        let envelope = controller.write().toggle();
        self.send(Some(envelope));
    }

    pub fn reset(&self) {
        let mut controller = self.controller;
        let envelope = controller.write().reset();
        self.send(Some(envelope));
    }

    pub fn skip(&self) {
        let mut controller = self.controller;
        let envelope = controller.write().skip();
        self.send(Some(envelope));
    }

    pub fn step(&self, delta: i64) {
        let mut controller = self.controller;
        let envelope = controller.write().step(delta);
        self.send(envelope);
    }

    pub fn input(&self, raw: &str) {
        let mut controller = self.controller;
        let envelope = controller.write().input(raw);
        self.send(envelope);
    }

    pub fn navigate(&self, nav: Nav) {
        let mut controller = self.controller;
        controller.write().navigate(nav);
    }

    fn send(&self, envelope: Option<Envelope>) {
        let Some(envelope) = envelope else {
            return;
        };
        let bridge = (*self.bridge.peek()).clone();
        match bridge {
            Some(bridge) => bridge.send(&envelope),
            None => log::warn!("No relay connection, dropping {}", envelope.request.action()),
        }
    }
}

impl Default for PopupContext {
    fn default() -> Self {
        Self::new()
    }
}
