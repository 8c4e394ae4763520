// Background timer control
// Applies forwarded actions to the stored record. The countdown tick
// lives elsewhere and reports back through `updateTimer`.

use serde_json::{Map, Value};

use crate::error::{ExtensionError, Result};
use crate::protocol::{Request, Response};
use crate::settings::{Session, SettingKey, Settings, TimerRecord};
use crate::store::{self, SettingsStore};

impl TimerRecord {
    pub fn start(&mut self) {
        if self.remaining_sec == 0 {
            self.remaining_sec = self.full_sec();
        }
        self.timer_running = true;
    }

    pub fn pause(&mut self) {
        self.timer_running = false;
    }

    pub fn reset(&mut self) {
        self.remaining_sec = self.full_sec();
        self.timer_running = false;
    }

    /// Move to the next session of the cycle.
    pub fn skip(&mut self) {
        self.current_session = match self.current_session {
            Session::Focus => {
                self.session_count += 1;
                if self.session_count >= self.sessions_before_long {
                    self.session_count = 0;
                    Session::LongBreak
                } else {
                    Session::ShortBreak
                }
            }
            Session::ShortBreak | Session::LongBreak => Session::Focus,
        };
        self.remaining_sec = self.full_sec();
    }

    /// Merge a countdown report. Only session-state fields are accepted.
    pub fn apply_update(&mut self, payload: &Map<String, Value>) -> Result<()> {
        let patch: Settings = serde_json::from_value(Value::Object(payload.clone()))?;
        let touches_durations = SettingKey::ADJUSTABLE
            .iter()
            .any(|key| !patch.select(&[*key]).is_empty());
        if touches_durations {
            return Err(ExtensionError::Invariant(
                "updateTimer may only carry session state".to_string(),
            ));
        }

        let mut merged = self.to_settings();
        merged.merge(patch);
        let next = TimerRecord::from_settings(&merged);
        next.check()?;
        *self = next;
        Ok(())
    }
}

/// Request handler run inside the background service worker.
pub struct TimerService<S> {
    store: S,
}

impl<S: SettingsStore> TimerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn handle(&self, request: Request) -> Response {
        let action = request.action();
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("{} failed: {}", action, e);
                Response::failure(e)
            }
        }
    }

    async fn dispatch(&self, request: Request) -> Result<Response> {
        match request {
            Request::GetSettings { keys } => Ok(Response::Settings {
                settings: self.store.get(&keys).await?,
            }),
            Request::SaveSetting { key, value } => {
                store::save_setting(&self.store, key, value).await?;
                Ok(Response::Success { success: true })
            }
            Request::StartTimer => {
                let record = self.mutate(TimerRecord::start).await?;
                Ok(Response::TimerRunning {
                    timer_running: record.timer_running,
                })
            }
            Request::PauseTimer => {
                let record = self.mutate(TimerRecord::pause).await?;
                Ok(Response::TimerRunning {
                    timer_running: record.timer_running,
                })
            }
            Request::ResetTimer => {
                self.mutate(TimerRecord::reset).await?;
                log::info!("Timer reset");
                Ok(Response::Success { success: true })
            }
            Request::SkipSession => {
                let record = self.mutate(TimerRecord::skip).await?;
                log::info!("Session skipped, now {}", record.current_session);
                Ok(Response::Success { success: true })
            }
            Request::UpdateTimer { payload } => {
                let mut record = store::read_record(&self.store).await?;
                record.apply_update(&payload)?;
                let patch = record.to_settings().select(&SettingKey::SESSION_STATE);
                self.store.set(&patch).await?;
                Ok(Response::Success { success: true })
            }
        }
    }

    async fn mutate(&self, op: impl FnOnce(&mut TimerRecord)) -> Result<TimerRecord> {
        let mut record = store::read_record(&self.store).await?;
        op(&mut record);
        let patch = record.to_settings().select(&SettingKey::SESSION_STATE);
        self.store.set(&patch).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use futures::executor::block_on;
    use serde_json::json;

    fn service(settings: Settings) -> TimerService<MemoryStore> {
        TimerService::new(MemoryStore::with(settings))
    }

    #[test]
    fn test_skip_walks_the_cycle() {
        let mut record = TimerRecord {
            sessions_before_long: 2,
            ..Default::default()
        };
        let mut seen = Vec::new();
        for _ in 0..4 {
            record.skip();
            record.check().unwrap();
            seen.push((record.current_session, record.session_count));
        }
        assert_eq!(
            seen,
            vec![
                (Session::ShortBreak, 1),
                (Session::Focus, 1),
                (Session::LongBreak, 0),
                (Session::Focus, 0),
            ]
        );
        assert_eq!(record.remaining_sec, record.focus * 60);
    }

    #[test]
    fn test_skip_keeps_running_flag() {
        let mut record = TimerRecord {
            timer_running: true,
            ..Default::default()
        };
        record.skip();
        assert!(record.timer_running);
        assert_eq!(record.remaining_sec, 5 * 60);
    }

    #[test]
    fn test_start_refills_finished_session() {
        let mut record = TimerRecord {
            remaining_sec: 0,
            ..Default::default()
        };
        record.start();
        assert!(record.timer_running);
        assert_eq!(record.remaining_sec, 1500);
    }

    #[test]
    fn test_start_and_pause_report_running_flag() {
        let svc = service(Settings::default());
        let started = block_on(svc.handle(Request::StartTimer));
        assert_eq!(started, Response::TimerRunning { timer_running: true });
        assert_eq!(svc.store().snapshot().timer_running, Some(true));

        let paused = block_on(svc.handle(Request::PauseTimer));
        assert_eq!(paused, Response::TimerRunning { timer_running: false });
    }

    #[test]
    fn test_reset_stops_and_refills() {
        let svc = service(Settings {
            remaining_sec: Some(17),
            timer_running: Some(true),
            ..Default::default()
        });
        assert!(block_on(svc.handle(Request::ResetTimer)).is_success());
        let stored = svc.store().snapshot();
        assert_eq!(stored.remaining_sec, Some(1500));
        assert_eq!(stored.timer_running, Some(false));
    }

    #[test]
    fn test_update_timer_rejects_broken_invariant() {
        let svc = service(Settings::default());
        let mut payload = Map::new();
        payload.insert("remainingSec".to_string(), json!(99_999));
        let response = block_on(svc.handle(Request::UpdateTimer { payload }));
        assert_eq!(response, Response::Success { success: false });
        assert!(svc.store().writes().is_empty());
    }

    #[test]
    fn test_update_timer_merges_tick() {
        let svc = service(Settings::default());
        let mut payload = Map::new();
        payload.insert("remainingSec".to_string(), json!(1499));
        let response = block_on(svc.handle(Request::UpdateTimer { payload }));
        assert!(response.is_success());
        assert_eq!(svc.store().snapshot().remaining_sec, Some(1499));
    }

    /// Applies a concurrent `saveSetting` right after the first read.
    struct Interleaved {
        inner: MemoryStore,
        concurrent: std::cell::Cell<Option<Settings>>,
    }

    #[async_trait::async_trait(?Send)]
    impl SettingsStore for Interleaved {
        async fn get(&self, keys: &[SettingKey]) -> Result<Settings> {
            let got = self.inner.get(keys).await?;
            if let Some(edit) = self.concurrent.take() {
                self.inner.set(&edit).await?;
            }
            Ok(got)
        }

        async fn set(&self, patch: &Settings) -> Result<()> {
            self.inner.set(patch).await
        }
    }

    #[test]
    fn test_update_timer_keeps_concurrent_setting() {
        let svc = TimerService::new(Interleaved {
            inner: MemoryStore::new(),
            concurrent: std::cell::Cell::new(Some(Settings {
                focus: Some(50),
                ..Default::default()
            })),
        });
        let mut payload = Map::new();
        payload.insert("remainingSec".to_string(), json!(1400));
        assert!(block_on(svc.handle(Request::UpdateTimer { payload })).is_success());

        let stored = svc.store().inner.snapshot();
        assert_eq!(stored.focus, Some(50));
        assert_eq!(stored.remaining_sec, Some(1400));
        let last = svc.store().inner.writes().pop().unwrap();
        assert_eq!(last, last.select(&SettingKey::SESSION_STATE));
    }

    #[test]
    fn test_update_timer_refuses_duration_change() {
        let mut record = TimerRecord::default();
        let mut payload = Map::new();
        payload.insert("focus".to_string(), json!(90));
        assert!(record.apply_update(&payload).is_err());
        assert_eq!(record.focus, 25);
    }
}
