// Settings and timer record shared by popup, relay and background
// Every context holds a copy; chrome.storage.local owns the real one

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ExtensionError, Result};

pub const DEFAULT_FOCUS_MIN: u32 = 25;
pub const DEFAULT_SHORT_BREAK_MIN: u32 = 5;
pub const DEFAULT_LONG_BREAK_MIN: u32 = 15;
pub const DEFAULT_SESSIONS_BEFORE_LONG: u32 = 4;

/// Upper bound for every adjustable setting (a day, in minutes).
pub const MAX_SETTING_VALUE: u32 = 24 * 60;

/// One timer phase.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum Session {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
}

impl Session {
    pub fn as_str(&self) -> &'static str {
        match self {
            Session::Focus => "focus",
            Session::ShortBreak => "shortBreak",
            Session::LongBreak => "longBreak",
        }
    }

    /// The setting that holds this session's length in minutes.
    pub fn duration_key(&self) -> SettingKey {
        match self {
            Session::Focus => SettingKey::Focus,
            Session::ShortBreak => SettingKey::ShortBreak,
            Session::LongBreak => SettingKey::LongBreak,
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the persisted keys.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    Focus,
    ShortBreak,
    LongBreak,
    SessionsBeforeLong,
    CurrentSession,
    SessionCount,
    RemainingSec,
    TimerRunning,
}

impl SettingKey {
    /// Everything the popup asks for when it becomes ready.
    pub const ALL: [SettingKey; 8] = [
        SettingKey::Focus,
        SettingKey::ShortBreak,
        SettingKey::LongBreak,
        SettingKey::SessionsBeforeLong,
        SettingKey::CurrentSession,
        SettingKey::SessionCount,
        SettingKey::RemainingSec,
        SettingKey::TimerRunning,
    ];

    /// Re-fetched after reset/skip.
    pub const SESSION_STATE: [SettingKey; 4] = [
        SettingKey::RemainingSec,
        SettingKey::CurrentSession,
        SettingKey::SessionCount,
        SettingKey::TimerRunning,
    ];

    /// Rows of the settings list, in display order.
    pub const ADJUSTABLE: [SettingKey; 4] = [
        SettingKey::Focus,
        SettingKey::ShortBreak,
        SettingKey::LongBreak,
        SettingKey::SessionsBeforeLong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Focus => "focus",
            SettingKey::ShortBreak => "shortBreak",
            SettingKey::LongBreak => "longBreak",
            SettingKey::SessionsBeforeLong => "sessionsBeforeLong",
            SettingKey::CurrentSession => "currentSession",
            SettingKey::SessionCount => "sessionCount",
            SettingKey::RemainingSec => "remainingSec",
            SettingKey::TimerRunning => "timerRunning",
        }
    }

    pub fn is_adjustable(&self) -> bool {
        Self::ADJUSTABLE.contains(self)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ExtensionError;

    fn from_str(s: &str) -> Result<Self> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ExtensionError::UnknownKey(s.to_string()))
    }
}

/// A partial settings record.
///
/// Used for the popup cache, `getSettings` answers and storage change
/// patches alike; absent fields are simply unknown.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_break: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_break: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions_before_long: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_session: Option<Session>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_sec: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_running: Option<bool>,
}

impl Settings {
    /// Overwrite every field present in `patch`.
    pub fn merge(&mut self, patch: Settings) {
        if patch.focus.is_some() {
            self.focus = patch.focus;
        }
        if patch.short_break.is_some() {
            self.short_break = patch.short_break;
        }
        if patch.long_break.is_some() {
            self.long_break = patch.long_break;
        }
        if patch.sessions_before_long.is_some() {
            self.sessions_before_long = patch.sessions_before_long;
        }
        if patch.current_session.is_some() {
            self.current_session = patch.current_session;
        }
        if patch.session_count.is_some() {
            self.session_count = patch.session_count;
        }
        if patch.remaining_sec.is_some() {
            self.remaining_sec = patch.remaining_sec;
        }
        if patch.timer_running.is_some() {
            self.timer_running = patch.timer_running;
        }
    }

    /// Keep only the named fields.
    pub fn select(&self, keys: &[SettingKey]) -> Settings {
        let mut out = Settings::default();
        for key in keys {
            match key {
                SettingKey::Focus => out.focus = self.focus,
                SettingKey::ShortBreak => out.short_break = self.short_break,
                SettingKey::LongBreak => out.long_break = self.long_break,
                SettingKey::SessionsBeforeLong => {
                    out.sessions_before_long = self.sessions_before_long
                }
                SettingKey::CurrentSession => out.current_session = self.current_session,
                SettingKey::SessionCount => out.session_count = self.session_count,
                SettingKey::RemainingSec => out.remaining_sec = self.remaining_sec,
                SettingKey::TimerRunning => out.timer_running = self.timer_running,
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        *self == Settings::default()
    }

    /// Integer value of an adjustable key.
    pub fn number(&self, key: SettingKey) -> Option<u32> {
        match key {
            SettingKey::Focus => self.focus,
            SettingKey::ShortBreak => self.short_break,
            SettingKey::LongBreak => self.long_break,
            SettingKey::SessionsBeforeLong => self.sessions_before_long,
            SettingKey::SessionCount => self.session_count,
            SettingKey::RemainingSec => self.remaining_sec,
            SettingKey::CurrentSession | SettingKey::TimerRunning => None,
        }
    }

    pub fn set_number(&mut self, key: SettingKey, value: u32) {
        match key {
            SettingKey::Focus => self.focus = Some(value),
            SettingKey::ShortBreak => self.short_break = Some(value),
            SettingKey::LongBreak => self.long_break = Some(value),
            SettingKey::SessionsBeforeLong => self.sessions_before_long = Some(value),
            SettingKey::SessionCount => self.session_count = Some(value),
            SettingKey::RemainingSec => self.remaining_sec = Some(value),
            SettingKey::CurrentSession | SettingKey::TimerRunning => {
                log::warn!("{} is not numeric, ignoring {}", key, value);
            }
        }
    }

    /// Length in minutes of the session currently shown, if both are known.
    pub fn current_duration_min(&self) -> Option<u32> {
        let session = self.current_session.unwrap_or_default();
        self.number(session.duration_key())
    }
}

/// The fully populated record as the store sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerRecord {
    pub focus: u32,
    pub short_break: u32,
    pub long_break: u32,
    pub sessions_before_long: u32,
    pub current_session: Session,
    pub session_count: u32,
    pub remaining_sec: u32,
    pub timer_running: bool,
}

impl Default for TimerRecord {
    fn default() -> Self {
        Self {
            focus: DEFAULT_FOCUS_MIN,
            short_break: DEFAULT_SHORT_BREAK_MIN,
            long_break: DEFAULT_LONG_BREAK_MIN,
            sessions_before_long: DEFAULT_SESSIONS_BEFORE_LONG,
            current_session: Session::Focus,
            session_count: 0,
            remaining_sec: DEFAULT_FOCUS_MIN * 60,
            timer_running: false,
        }
    }
}

impl TimerRecord {
    /// Fill the holes of a stored partial record with defaults.
    pub fn from_settings(settings: &Settings) -> Self {
        let defaults = TimerRecord::default();
        Self {
            focus: settings.focus.unwrap_or(defaults.focus),
            short_break: settings.short_break.unwrap_or(defaults.short_break),
            long_break: settings.long_break.unwrap_or(defaults.long_break),
            sessions_before_long: settings
                .sessions_before_long
                .unwrap_or(defaults.sessions_before_long),
            current_session: settings.current_session.unwrap_or(defaults.current_session),
            session_count: settings.session_count.unwrap_or(defaults.session_count),
            remaining_sec: settings.remaining_sec.unwrap_or(defaults.remaining_sec),
            timer_running: settings.timer_running.unwrap_or(defaults.timer_running),
        }
    }

    pub fn to_settings(&self) -> Settings {
        Settings {
            focus: Some(self.focus),
            short_break: Some(self.short_break),
            long_break: Some(self.long_break),
            sessions_before_long: Some(self.sessions_before_long),
            current_session: Some(self.current_session),
            session_count: Some(self.session_count),
            remaining_sec: Some(self.remaining_sec),
            timer_running: Some(self.timer_running),
        }
    }

    pub fn duration_min(&self, session: Session) -> u32 {
        match session {
            Session::Focus => self.focus,
            Session::ShortBreak => self.short_break,
            Session::LongBreak => self.long_break,
        }
    }

    /// Full length of the current session in seconds. Saturates on stored
    /// values too large to express in seconds.
    pub fn full_sec(&self) -> u32 {
        self.duration_min(self.current_session).saturating_mul(60)
    }

    pub fn check(&self) -> Result<()> {
        if self.remaining_sec > self.full_sec() {
            return Err(ExtensionError::Invariant(format!(
                "remainingSec {} exceeds {} session of {} min",
                self.remaining_sec,
                self.current_session,
                self.duration_min(self.current_session)
            )));
        }
        if self.session_count >= self.sessions_before_long {
            return Err(ExtensionError::Invariant(format!(
                "sessionCount {} not below sessionsBeforeLong {}",
                self.session_count, self.sessions_before_long
            )));
        }
        Ok(())
    }

    /// Validate a `saveSetting` and return the patch that must be persisted.
    ///
    /// Besides the edited key the patch may carry `remainingSec` and
    /// `sessionCount` so the stored record keeps its invariants.
    pub fn apply_setting(&self, key: SettingKey, value: i64) -> Result<Settings> {
        if !key.is_adjustable() {
            return Err(ExtensionError::NotAdjustable(key));
        }
        let number = match u32::try_from(value) {
            Ok(n) if (1..=MAX_SETTING_VALUE).contains(&n) => n,
            _ => return Err(ExtensionError::InvalidValue { key, value }),
        };

        let mut next = self.clone();
        let mut patch = Settings::default();
        patch.set_number(key, number);

        match key {
            SettingKey::SessionsBeforeLong => {
                next.sessions_before_long = number;
                if next.session_count >= number {
                    next.session_count = number - 1;
                    patch.session_count = Some(next.session_count);
                }
            }
            _ => {
                match key {
                    SettingKey::Focus => next.focus = number,
                    SettingKey::ShortBreak => next.short_break = number,
                    _ => next.long_break = number,
                }
                if key == self.current_session.duration_key() {
                    let full = next.full_sec();
                    let remaining = if next.timer_running {
                        next.remaining_sec.min(full)
                    } else {
                        full
                    };
                    if remaining != next.remaining_sec {
                        next.remaining_sec = remaining;
                        patch.remaining_sec = Some(remaining);
                    }
                }
            }
        }

        next.check()?;
        Ok(patch)
    }
}
