// Content relay configuration
// Defaults match the resources shipped in static/; the content glue may
// pass a JSON override to `start_content`.

use serde::{Deserialize, Serialize};

use crate::closer::FADE_OUT_MS;
use crate::error::Result;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ExtensionConfig {
    /// id of the popup container inside the fetched markup
    pub container_id: String,
    /// element the popup UI renders into
    pub mount_id: String,
    pub markup_path: String,
    pub stylesheet_path: String,
    pub script_path: String,
    pub fade_out_ms: u32,
    pub close_event: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            container_id: "pomodoro-app".to_string(),
            mount_id: "pomodoro-root".to_string(),
            markup_path: "static/popup.html".to_string(),
            stylesheet_path: "static/popup.css".to_string(),
            script_path: "static/popup.js".to_string(),
            fade_out_ms: FADE_OUT_MS,
            close_event: "pointerdown".to_string(),
        }
    }
}

impl ExtensionConfig {
    /// Parse an override; missing fields keep their defaults.
    pub fn from_json(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let config = ExtensionConfig::from_json(Some(r#"{"fade_out_ms": 0}"#)).unwrap();
        assert_eq!(config.fade_out_ms, 0);
        assert_eq!(config.container_id, "pomodoro-app");
    }

    #[test]
    fn test_empty_override_is_default() {
        assert_eq!(ExtensionConfig::from_json(None).unwrap(), ExtensionConfig::default());
        assert_eq!(ExtensionConfig::from_json(Some("  ")).unwrap(), ExtensionConfig::default());
        assert!(ExtensionConfig::from_json(Some("{")).is_err());
    }
}
