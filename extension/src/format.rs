// Display helpers for the popup

use crate::settings::SettingKey;

/// Circumference of the progress ring (r = 50).
pub const RING_CIRCUMFERENCE: f64 = 314.0;

/// `MM:SS`, both fields zero-padded.
pub fn format_time(sec: u32) -> String {
    format!("{:02}:{:02}", sec / 60, sec % 60)
}

/// `"shortBreak"` → `"SHORT BREAK"`; a missing key reads as focus.
pub fn label_case(key: Option<&str>) -> String {
    let Some(key) = key.filter(|k| !k.is_empty()) else {
        return "FOCUS".to_string();
    };
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c.to_ascii_uppercase());
    }
    out.trim().to_string()
}

/// Share of the session still left, in `[0, 1]`.
pub fn progress_fraction(remaining_sec: u32, session_min: u32) -> f64 {
    let total = f64::from(session_min) * 60.0;
    if total <= 0.0 {
        return 0.0;
    }
    (f64::from(remaining_sec) / total).clamp(0.0, 1.0)
}

/// `stroke-dashoffset` for the ring; a full session draws the whole ring.
pub fn ring_offset(fraction: f64) -> f64 {
    RING_CIRCUMFERENCE - RING_CIRCUMFERENCE * fraction
}

/// One entry per session of the cycle, `true` for completed ones.
pub fn status_dots(session_count: u32, sessions_before_long: u32) -> Vec<bool> {
    (0..sessions_before_long).map(|i| i < session_count).collect()
}

pub fn unit_label(key: SettingKey) -> &'static str {
    match key {
        SettingKey::SessionsBeforeLong => "Sess.",
        _ => "min",
    }
}

/// Value column of the settings list, e.g. `"25 min"`.
pub fn setting_label(key: SettingKey, value: Option<u32>) -> String {
    match value {
        Some(v) => format!("{} {}", v, unit_label(key)),
        None => format!("-- {}", unit_label(key)),
    }
}

pub fn adjust_title(key: SettingKey) -> String {
    format!("{} Session", label_case(Some(key.as_str())))
}
