// Popup navigation
// Three views, exactly one active; only neighbouring views are reachable.

use crate::settings::SettingKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Timer,
    Settings,
    /// Editing one setting.
    Adjust(SettingKey),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nav {
    OpenSettings,
    CloseSettings,
    OpenAdjust(SettingKey),
    Back,
}

impl View {
    /// Next view, or `None` when `nav` is not allowed from here.
    pub fn next(self, nav: Nav) -> Option<View> {
        match (self, nav) {
            (View::Timer, Nav::OpenSettings) => Some(View::Settings),
            (View::Settings, Nav::CloseSettings) => Some(View::Timer),
            (View::Settings, Nav::OpenAdjust(key)) if key.is_adjustable() => {
                Some(View::Adjust(key))
            }
            (View::Adjust(_), Nav::Back) => Some(View::Settings),
            _ => None,
        }
    }

    pub fn adjusting(&self) -> Option<SettingKey> {
        match self {
            View::Adjust(key) => Some(*key),
            _ => None,
        }
    }
}

/// Step the adjust input by `delta`, never below `min`.
///
/// An unparsable input restarts from `min`.
pub fn adjust_value(input: &str, delta: i64, min: i64) -> i64 {
    match parse_input(input) {
        Some(current) => (current + delta).max(min),
        None => min,
    }
}

pub fn parse_input(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_adjust() {
        let steps = [
            Nav::OpenSettings,
            Nav::OpenAdjust(SettingKey::Focus),
            Nav::Back,
            Nav::CloseSettings,
        ];
        let mut view = View::Timer;
        let mut trail = vec![view];
        for nav in steps {
            view = view.next(nav).unwrap();
            trail.push(view);
        }
        assert_eq!(
            trail,
            vec![
                View::Timer,
                View::Settings,
                View::Adjust(SettingKey::Focus),
                View::Settings,
                View::Timer,
            ]
        );
    }

    #[test]
    fn test_no_shortcuts() {
        assert_eq!(View::Timer.next(Nav::OpenAdjust(SettingKey::Focus)), None);
        assert_eq!(View::Adjust(SettingKey::Focus).next(Nav::CloseSettings), None);
        assert_eq!(View::Timer.next(Nav::Back), None);
        assert_eq!(View::Settings.next(Nav::OpenAdjust(SettingKey::RemainingSec)), None);
    }

    #[test]
    fn test_adjust_value_clamps() {
        assert_eq!(adjust_value("1", -1, 1), 1);
        assert_eq!(adjust_value("5", 1, 1), 6);
        assert_eq!(adjust_value("abc", 1, 1), 1);
        assert_eq!(adjust_value(" 7 ", -1, 1), 6);
    }
}
