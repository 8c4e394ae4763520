// Content relay message handling
// Settings requests are served from storage, timer controls go to the
// background service worker.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{ExtensionError, Result};
use crate::protocol::{ReadySignal, Request, Response};
use crate::settings::{SettingKey, Settings};
use crate::store::{self, SettingsStore};

/// Channel to the background service worker.
#[async_trait(?Send)]
pub trait Background {
    /// Deliver `request` and return the raw reply (`Value::Null` if none came).
    async fn send(&self, request: &Request) -> Result<Value>;
}

pub struct Relay<S, B> {
    store: S,
    background: B,
}

impl<S: SettingsStore, B: Background> Relay<S, B> {
    pub fn new(store: S, background: B) -> Self {
        Self { store, background }
    }

    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::GetSettings { keys } => match self.store.get(&keys).await {
                Ok(settings) => Response::Settings { settings },
                Err(e) => {
                    log::error!("Failed to get settings: {}", e);
                    Response::error(e)
                }
            },
            Request::SaveSetting { key, value } => {
                match store::save_setting(&self.store, key, value).await {
                    Ok(_) => Response::Success { success: true },
                    Err(e) => {
                        log::error!("Failed to save setting {}: {}", key, e);
                        Response::failure(e)
                    }
                }
            }
            Request::StartTimer
            | Request::PauseTimer
            | Request::ResetTimer
            | Request::SkipSession
            | Request::UpdateTimer { .. } => self.forward(request).await,
        }
    }

    async fn forward(&self, request: Request) -> Response {
        let action = request.action();
        let reply = match self.background.send(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Background did not take {}: {}", action, e);
                return Response::error(e);
            }
        };

        if reply.is_null() {
            log::error!("No response from background for {}", action);
            return Response::error(ExtensionError::Background(format!(
                "no response to {}",
                action
            )));
        }

        match serde_json::from_value::<Response>(reply) {
            Ok(Response::Error { error }) => {
                log::error!("Background reported error for {}: {}", action, error);
                Response::Error { error }
            }
            Ok(response) => response,
            Err(e) => {
                log::error!("Malformed background reply to {}: {}", action, e);
                Response::error(e)
            }
        }
    }

    /// Answer to `popupReadyForSettings`.
    pub async fn initial_settings(&self, ready: &ReadySignal) -> Result<Settings> {
        self.store.get(&ready.keys).await
    }
}

/// Turn a `storage.onChanged` payload (`{key: {oldValue, newValue}}`) into a
/// settings patch. Removed and unknown keys are dropped.
pub fn settings_from_changes(changes: &Map<String, Value>) -> Settings {
    let mut picked = Map::new();
    for (name, change) in changes {
        if name.parse::<SettingKey>().is_err() {
            continue;
        }
        if let Some(new_value) = change.get("newValue") {
            picked.insert(name.clone(), new_value.clone());
        }
    }

    let mut patch = Settings::default();
    // Per key, so one bad value does not hide the rest.
    for (name, value) in picked {
        let mut single = Map::new();
        single.insert(name.clone(), value);
        match serde_json::from_value::<Settings>(Value::Object(single)) {
            Ok(one) => patch.merge(one),
            Err(e) => log::warn!("Ignoring stored {}: {}", name, e),
        }
    }
    patch
}

/// Storage change → `extensionStorageUpdate` payload, if the popup can take it.
pub fn storage_update(mounted: bool, changes: &Map<String, Value>) -> Option<Settings> {
    if !mounted {
        log::debug!("Popup not mounted, dropping storage change");
        return None;
    }
    let patch = settings_from_changes(changes);
    if patch.is_empty() {
        None
    } else {
        Some(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Session;
    use crate::store::MemoryStore;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;

    /// Replies with a canned value and remembers what it was sent.
    struct Scripted {
        reply: Result<Value>,
        sent: RefCell<Vec<Request>>,
    }

    impl Scripted {
        fn replying(reply: Value) -> Self {
            Self {
                reply: Ok(reply),
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl Background for Scripted {
        async fn send(&self, request: &Request) -> Result<Value> {
            self.sent.borrow_mut().push(request.clone());
            match &self.reply {
                Ok(v) => Ok(v.clone()),
                Err(e) => Err(ExtensionError::Background(e.to_string())),
            }
        }
    }

    fn relay(reply: Value) -> Relay<MemoryStore, Scripted> {
        Relay::new(MemoryStore::new(), Scripted::replying(reply))
    }

    #[test]
    fn test_save_then_get() {
        let relay = relay(Value::Null);
        let saved = block_on(relay.handle(Request::SaveSetting {
            key: SettingKey::Focus,
            value: 30,
        }));
        assert_eq!(saved, Response::Success { success: true });

        let got = block_on(relay.handle(Request::GetSettings {
            keys: vec![SettingKey::Focus],
        }));
        assert_eq!(
            serde_json::to_value(got).unwrap(),
            json!({"settings": {"focus": 30}})
        );
        assert!(relay.background.sent.borrow().is_empty());
    }

    #[test]
    fn test_invalid_save_is_acknowledged_as_failure() {
        let relay = relay(Value::Null);
        let saved = block_on(relay.handle(Request::SaveSetting {
            key: SettingKey::CurrentSession,
            value: 2,
        }));
        assert_eq!(saved, Response::Success { success: false });
    }

    /// Storage that refuses every write.
    struct ReadOnly;

    #[async_trait(?Send)]
    impl SettingsStore for ReadOnly {
        async fn get(&self, _keys: &[SettingKey]) -> Result<Settings> {
            Ok(Settings::default())
        }

        async fn set(&self, _patch: &Settings) -> Result<()> {
            Err(ExtensionError::Storage("QUOTA_BYTES quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_storage_failure_on_save_is_an_error() {
        let relay = Relay::new(ReadOnly, Scripted::replying(Value::Null));
        let saved = block_on(relay.handle(Request::SaveSetting {
            key: SettingKey::Focus,
            value: 30,
        }));
        assert!(matches!(saved, Response::Error { .. }));
    }

    #[test]
    fn test_timer_controls_forwarded_verbatim() {
        let relay = relay(json!({"timerRunning": true}));
        let response = block_on(relay.handle(Request::StartTimer));
        assert_eq!(response, Response::TimerRunning { timer_running: true });
        assert_eq!(*relay.background.sent.borrow(), vec![Request::StartTimer]);
    }

    #[test]
    fn test_background_errors_are_relayed_not_raised() {
        let erroring = relay(json!({"error": "worker asleep"}));
        assert_eq!(
            block_on(erroring.handle(Request::SkipSession)),
            Response::error("worker asleep")
        );

        let silent = relay(Value::Null);
        assert!(matches!(
            block_on(silent.handle(Request::ResetTimer)),
            Response::Error { .. }
        ));

        let failing = Relay::new(
            MemoryStore::new(),
            Scripted {
                reply: Err(ExtensionError::Background("port closed".to_string())),
                sent: RefCell::new(Vec::new()),
            },
        );
        assert!(matches!(
            block_on(failing.handle(Request::PauseTimer)),
            Response::Error { .. }
        ));
    }

    #[test]
    fn test_initial_settings_reads_requested_keys() {
        let relay = Relay::new(
            MemoryStore::with(Settings {
                focus: Some(40),
                current_session: Some(Session::ShortBreak),
                ..Default::default()
            }),
            Scripted::replying(Value::Null),
        );
        let ready = ReadySignal {
            keys: vec![SettingKey::CurrentSession],
        };
        let settings = block_on(relay.initial_settings(&ready)).unwrap();
        assert_eq!(settings.current_session, Some(Session::ShortBreak));
        assert!(settings.focus.is_none());
    }

    #[test]
    fn test_changes_become_patch() {
        let changes = json!({
            "remainingSec": {"oldValue": 10, "newValue": 9},
            "timerRunning": {"newValue": true},
            "sessionCount": {"oldValue": 1},
            "somethingElse": {"newValue": "x"},
            "focus": {"newValue": "not a number"}
        });
        let patch = settings_from_changes(changes.as_object().unwrap());
        assert_eq!(
            patch,
            Settings {
                remaining_sec: Some(9),
                timer_running: Some(true),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_storage_update_guarded_on_mount() {
        let changes = json!({"remainingSec": {"newValue": 9}});
        let changes = changes.as_object().unwrap();
        assert!(storage_update(false, changes).is_none());
        assert_eq!(
            storage_update(true, changes).and_then(|p| p.remaining_sec),
            Some(9)
        );
        assert!(storage_update(true, &Map::new()).is_none());
    }
}
