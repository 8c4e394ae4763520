// Popup state for one popup lifetime
// Holds the settings cache, the active view and the requests still waiting
// for a relay reply. Methods return the envelopes to send; the bridge does
// the sending.

use std::collections::HashMap;

use crate::format;
use crate::protocol::{Envelope, ReadySignal, Reply, Request, Response};
use crate::settings::{SettingKey, Settings, MAX_SETTING_VALUE};
use crate::view::{self, Nav, View};

/// Minimum value of any adjustable setting.
pub const ADJUST_MIN: i64 = 1;

/// Everything the relay can tell the popup.
#[derive(Clone, Debug, PartialEq)]
pub enum PopupEvent {
    Initial(Settings),
    Update(Settings),
    Reply(Reply),
}

/// What an in-flight request was for.
#[derive(Clone, Debug, PartialEq)]
enum Pending {
    Toggle,
    Reset,
    Skip,
    Save { key: SettingKey, value: u32 },
    Resync,
}

#[derive(Debug, Default)]
pub struct PopupController {
    settings: Settings,
    view: View,
    pending: HashMap<u32, Pending>,
    next_id: u32,
    /// Text of the adjust input when it differs from the cache.
    draft: Option<String>,
}

impl PopupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn ready_signal(&self) -> ReadySignal {
        ReadySignal {
            keys: SettingKey::ALL.to_vec(),
        }
    }

    /// Apply one relay event; may return a follow-up request.
    pub fn apply(&mut self, event: PopupEvent) -> Option<Envelope> {
        match event {
            PopupEvent::Initial(settings) => {
                self.on_initial(settings);
                None
            }
            PopupEvent::Update(changed) => {
                self.on_update(changed);
                None
            }
            PopupEvent::Reply(reply) => self.on_reply(reply),
        }
    }

    /// `initialExtensionSettings`
    pub fn on_initial(&mut self, settings: Settings) {
        log::info!("Initial settings loaded: {:?}", settings);
        self.settings.merge(settings);
    }

    /// `extensionStorageUpdate`
    pub fn on_update(&mut self, changed: Settings) {
        log::debug!("Storage updated: {:?}", changed);
        self.settings.merge(changed);
    }

    /// Returns false when the move is not allowed from the current view.
    pub fn navigate(&mut self, nav: Nav) -> bool {
        match self.view.next(nav) {
            Some(next) => {
                self.view = next;
                self.draft = None;
                true
            }
            None => {
                log::warn!("Ignoring {:?} from {:?}", nav, self.view);
                false
            }
        }
    }

    /// Start when idle, pause when running.
    pub fn toggle(&mut self) -> Envelope {
        let request = if self.settings.timer_running.unwrap_or(false) {
            Request::PauseTimer
        } else {
            Request::StartTimer
        };
        self.issue(request, Pending::Toggle)
    }

    pub fn reset(&mut self) -> Envelope {
        self.issue(Request::ResetTimer, Pending::Reset)
    }

    pub fn skip(&mut self) -> Envelope {
        self.issue(Request::SkipSession, Pending::Skip)
    }

    /// Direct input in the adjust view. Unparsable or out-of-range input
    /// sends nothing.
    pub fn input(&mut self, raw: &str) -> Option<Envelope> {
        let key = self.view.adjusting()?;
        self.draft = Some(raw.to_string());
        let value = view::parse_input(raw)?;
        self.save(key, value)
    }

    /// +/- buttons in the adjust view. Steps from what the input shows, which
    /// may be ahead of the cache while saves are unacknowledged.
    pub fn step(&mut self, delta: i64) -> Option<Envelope> {
        let key = self.view.adjusting()?;
        let current = self.adjust_input();
        let value = view::adjust_value(&current, delta, ADJUST_MIN);
        self.draft = Some(value.to_string());
        self.save(key, value)
    }

    fn save(&mut self, key: SettingKey, value: i64) -> Option<Envelope> {
        let stored = match u32::try_from(value) {
            Ok(v) if v <= MAX_SETTING_VALUE => v,
            _ => {
                log::warn!("Refusing to save {} = {}", key, value);
                return None;
            }
        };
        Some(self.issue(
            Request::SaveSetting { key, value },
            Pending::Save { key, value: stored },
        ))
    }

    /// Route a relay reply; may return a follow-up request.
    pub fn on_reply(&mut self, reply: Reply) -> Option<Envelope> {
        let Some(pending) = self.pending.remove(&reply.id) else {
            log::warn!("Reply to unknown request {}", reply.id);
            return None;
        };

        match (pending, reply.response) {
            (_, Response::Error { error }) => {
                log::error!("Request {} failed: {}", reply.id, error);
                None
            }
            (Pending::Toggle, Response::TimerRunning { timer_running }) => {
                self.settings.timer_running = Some(timer_running);
                None
            }
            (Pending::Reset, Response::Success { success: true }) => {
                log::info!("Timer reset.");
                Some(self.resync())
            }
            (Pending::Skip, Response::Success { success: true }) => {
                log::info!("Session skipped.");
                Some(self.resync())
            }
            (Pending::Save { key, value }, Response::Success { success: true }) => {
                log::info!("Setting {} saved: {}", key, value);
                self.settings.set_number(key, value);
                None
            }
            (Pending::Save { key, value }, Response::Success { success: false }) => {
                log::warn!("Setting {} = {} was rejected", key, value);
                self.draft = None;
                None
            }
            (Pending::Resync, Response::Settings { settings }) => {
                self.settings.merge(settings);
                None
            }
            (pending, other) => {
                log::error!("Unexpected reply to {:?}: {:?}", pending, other);
                None
            }
        }
    }

    fn resync(&mut self) -> Envelope {
        self.issue(
            Request::GetSettings {
                keys: SettingKey::SESSION_STATE.to_vec(),
            },
            Pending::Resync,
        )
    }

    fn issue(&mut self, request: Request, pending: Pending) -> Envelope {
        self.next_id = self.next_id.wrapping_add(1);
        let id = self.next_id;
        self.pending.insert(id, pending);
        Envelope { id, request }
    }

    // Render data

    /// Nothing timer-related is drawn before `remainingSec` arrives.
    pub fn is_loaded(&self) -> bool {
        self.settings.remaining_sec.is_some()
    }

    pub fn clock(&self) -> String {
        format::format_time(self.settings.remaining_sec.unwrap_or(0))
    }

    pub fn session_label(&self) -> String {
        format::label_case(self.settings.current_session.as_ref().map(|s| s.as_str()))
    }

    pub fn ring_offset(&self) -> f64 {
        let fraction = match (self.settings.remaining_sec, self.settings.current_duration_min()) {
            (Some(remaining), Some(minutes)) => format::progress_fraction(remaining, minutes),
            _ => 0.0,
        };
        format::ring_offset(fraction)
    }

    pub fn start_label(&self) -> &'static str {
        if self.settings.timer_running.unwrap_or(false) {
            "PAUSE"
        } else {
            "START"
        }
    }

    pub fn dots(&self) -> Vec<bool> {
        match (self.settings.session_count, self.settings.sessions_before_long) {
            (Some(count), Some(cycle)) => format::status_dots(count, cycle),
            _ => Vec::new(),
        }
    }

    pub fn setting_label(&self, key: SettingKey) -> String {
        format::setting_label(key, self.settings.number(key))
    }

    /// Current text of the adjust input.
    pub fn adjust_input(&self) -> String {
        if let Some(draft) = &self.draft {
            return draft.clone();
        }
        self.view
            .adjusting()
            .and_then(|key| self.settings.number(key))
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}
