// Settings store seam
// chrome.storage.local in the browser, an in-memory map in tests

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::error::Result;
use crate::settings::{SettingKey, Settings, TimerRecord};

#[async_trait(?Send)]
pub trait SettingsStore {
    /// Read the named keys; keys never written are absent from the result.
    async fn get(&self, keys: &[SettingKey]) -> Result<Settings>;

    /// Write every field present in `patch`.
    async fn set(&self, patch: &Settings) -> Result<()>;
}

/// Whole record with defaults for anything not stored yet.
pub async fn read_record<S: SettingsStore + ?Sized>(store: &S) -> Result<TimerRecord> {
    let stored = store.get(&SettingKey::ALL).await?;
    Ok(TimerRecord::from_settings(&stored))
}

/// `saveSetting`: validate against the stored record and persist the patch.
pub async fn save_setting<S: SettingsStore + ?Sized>(
    store: &S,
    key: SettingKey,
    value: i64,
) -> Result<Settings> {
    let record = read_record(store).await?;
    let patch = record.apply_setting(key, value)?;
    store.set(&patch).await?;
    log::info!("Setting {} saved: {}", key, value);
    Ok(patch)
}

/// Write defaults for keys that were never stored; returns what was written.
pub async fn seed_defaults<S: SettingsStore + ?Sized>(store: &S) -> Result<Settings> {
    let stored = store.get(&SettingKey::ALL).await?;
    let mut missing = TimerRecord::default().to_settings();
    for key in SettingKey::ALL {
        if !stored.select(&[key]).is_empty() {
            missing = clear(missing, key);
        }
    }
    if !missing.is_empty() {
        store.set(&missing).await?;
    }
    Ok(missing)
}

fn clear(mut settings: Settings, key: SettingKey) -> Settings {
    match key {
        SettingKey::Focus => settings.focus = None,
        SettingKey::ShortBreak => settings.short_break = None,
        SettingKey::LongBreak => settings.long_break = None,
        SettingKey::SessionsBeforeLong => settings.sessions_before_long = None,
        SettingKey::CurrentSession => settings.current_session = None,
        SettingKey::SessionCount => settings.session_count = None,
        SettingKey::RemainingSec => settings.remaining_sec = None,
        SettingKey::TimerRunning => settings.timer_running = None,
    }
    settings
}

/// Store kept in memory. Clones share the same record.
#[derive(Clone, Default)]
pub struct MemoryStore {
    record: Rc<RefCell<Settings>>,
    writes: Rc<RefCell<Vec<Settings>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(settings: Settings) -> Self {
        let store = Self::new();
        *store.record.borrow_mut() = settings;
        store
    }

    pub fn snapshot(&self) -> Settings {
        self.record.borrow().clone()
    }

    /// Every patch written so far, oldest first.
    pub fn writes(&self) -> Vec<Settings> {
        self.writes.borrow().clone()
    }
}

#[async_trait(?Send)]
impl SettingsStore for MemoryStore {
    async fn get(&self, keys: &[SettingKey]) -> Result<Settings> {
        Ok(self.record.borrow().select(keys))
    }

    async fn set(&self, patch: &Settings) -> Result<()> {
        self.record.borrow_mut().merge(patch.clone());
        self.writes.borrow_mut().push(patch.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_save_then_get_round_trip() {
        let store = MemoryStore::new();
        block_on(save_setting(&store, SettingKey::Focus, 30)).unwrap();
        let got = block_on(store.get(&[SettingKey::Focus])).unwrap();
        assert_eq!(
            got,
            Settings {
                focus: Some(30),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_save_rejects_without_writing() {
        let store = MemoryStore::new();
        assert!(block_on(save_setting(&store, SettingKey::ShortBreak, -3)).is_err());
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_seed_defaults_fills_only_missing() {
        let store = MemoryStore::with(Settings {
            focus: Some(50),
            ..Default::default()
        });
        let written = block_on(seed_defaults(&store)).unwrap();
        assert!(written.focus.is_none());
        assert_eq!(written.short_break, Some(5));

        let record = block_on(read_record(&store)).unwrap();
        assert_eq!(record.focus, 50);
        assert_eq!(record.sessions_before_long, 4);

        let again = block_on(seed_defaults(&store)).unwrap();
        assert!(again.is_empty());
        assert_eq!(store.writes().len(), 1);
    }
}
