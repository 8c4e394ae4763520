// Messages between popup, content relay and background
// Requests are a closed set; every handler matches them exhaustively

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtensionError;
use crate::settings::{SettingKey, Settings};

/// Custom DOM events exchanged on the popup container.
pub mod signal {
    /// popup → relay: `{keys}`
    pub const POPUP_READY: &str = "popupReadyForSettings";
    /// relay → popup: settings object
    pub const INITIAL_SETTINGS: &str = "initialExtensionSettings";
    /// relay → popup: changed keys only
    pub const STORAGE_UPDATE: &str = "extensionStorageUpdate";
    /// popup → relay: `{id, request}`
    pub const POPUP_REQUEST: &str = "popupRequest";
    /// relay → popup: `{id, response}`
    pub const RELAY_RESPONSE: &str = "relayResponse";
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    GetSettings {
        keys: Vec<SettingKey>,
    },
    SaveSetting {
        key: SettingKey,
        value: i64,
    },
    StartTimer,
    PauseTimer,
    ResetTimer,
    SkipSession,
    /// Pushed by the countdown loop; the relay does not look inside.
    UpdateTimer {
        #[serde(flatten)]
        payload: Map<String, Value>,
    },
}

impl Request {
    pub fn action(&self) -> &'static str {
        match self {
            Request::GetSettings { .. } => "getSettings",
            Request::SaveSetting { .. } => "saveSetting",
            Request::StartTimer => "startTimer",
            Request::PauseTimer => "pauseTimer",
            Request::ResetTimer => "resetTimer",
            Request::SkipSession => "skipSession",
            Request::UpdateTimer { .. } => "updateTimer",
        }
    }
}

/// Answer to a [`Request`].
///
/// Untagged on the wire, so variant order matters: the error shape is tried
/// first and the opaque fallback last.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Response {
    Error {
        error: String,
    },
    Settings {
        settings: Settings,
    },
    #[serde(rename_all = "camelCase")]
    TimerRunning {
        timer_running: bool,
    },
    Success {
        success: bool,
    },
    Opaque(Value),
}

impl Response {
    pub fn error(err: impl ToString) -> Self {
        Response::Error {
            error: err.to_string(),
        }
    }

    /// Rejected input reads as `{success: false}`; anything else that went
    /// wrong travels as `{error}`.
    pub fn failure(err: ExtensionError) -> Self {
        match err {
            ExtensionError::NotAdjustable(_)
            | ExtensionError::InvalidValue { .. }
            | ExtensionError::Invariant(_) => Response::Success { success: false },
            other => Response::error(other),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { success: true })
    }
}

/// `popupReadyForSettings` payload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReadySignal {
    pub keys: Vec<SettingKey>,
}

/// A request tagged with the id the popup uses to match the reply.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Envelope {
    pub id: u32,
    pub request: Request,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Reply {
    pub id: u32,
    pub response: Response,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let save = Request::SaveSetting {
            key: SettingKey::Focus,
            value: 30,
        };
        assert_eq!(
            serde_json::to_value(&save).unwrap(),
            json!({"action": "saveSetting", "key": "focus", "value": 30})
        );
        assert_eq!(
            serde_json::to_value(Request::SkipSession).unwrap(),
            json!({"action": "skipSession"})
        );

        let get: Request = serde_json::from_value(
            json!({"action": "getSettings", "keys": ["remainingSec", "timerRunning"]}),
        )
        .unwrap();
        assert_eq!(
            get,
            Request::GetSettings {
                keys: vec![SettingKey::RemainingSec, SettingKey::TimerRunning]
            }
        );
    }

    #[test]
    fn test_update_timer_is_opaque() {
        let raw = json!({"action": "updateTimer", "remainingSec": 12, "source": "tick"});
        let request: Request = serde_json::from_value(raw.clone()).unwrap();
        match &request {
            Request::UpdateTimer { payload } => {
                assert_eq!(payload.get("remainingSec"), Some(&json!(12)));
                assert_eq!(payload.get("source"), Some(&json!("tick")));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(serde_json::to_value(&request).unwrap(), raw);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: Result<Request, _> = serde_json::from_value(json!({"action": "launchRocket"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_response_shapes() {
        let running: Response = serde_json::from_value(json!({"timerRunning": true})).unwrap();
        assert_eq!(running, Response::TimerRunning { timer_running: true });

        let ok: Response = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(ok.is_success());

        let failed: Response = serde_json::from_value(json!({"error": "no tab"})).unwrap();
        assert_eq!(failed, Response::error("no tab"));

        let settings: Response =
            serde_json::from_value(json!({"settings": {"focus": 30}})).unwrap();
        match settings {
            Response::Settings { settings } => assert_eq!(settings.focus, Some(30)),
            other => panic!("unexpected {:?}", other),
        }

        let opaque: Response = serde_json::from_value(json!({"ticks": 3})).unwrap();
        assert_eq!(opaque, Response::Opaque(json!({"ticks": 3})));
    }

    #[test]
    fn test_failure_mapping() {
        assert_eq!(
            Response::failure(ExtensionError::Invariant("x".to_string())),
            Response::Success { success: false }
        );
        assert!(matches!(
            Response::failure(ExtensionError::Storage("quota".to_string())),
            Response::Error { .. }
        ));
    }
}
