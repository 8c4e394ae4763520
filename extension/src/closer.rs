// Outside-click-to-close decision logic
// The DOM listener in `content` feeds every pointer-down through this gate.

/// Delay between the fade starting and the popup being removed.
pub const FADE_OUT_MS: u32 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing to do.
    Ignore,
    /// Fade and tear the popup down.
    Close,
}

#[derive(Debug, Default)]
pub struct OutsideClickGate {
    seen_opening_click: bool,
    closing: bool,
}

impl OutsideClickGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first pointer-down is the click that opened the popup and is
    /// always ignored. After a close has been requested the gate stays shut.
    pub fn on_pointer_down(&mut self, inside_popup: bool) -> ClickOutcome {
        if !self.seen_opening_click {
            self.seen_opening_click = true;
            return ClickOutcome::Ignore;
        }
        if self.closing || inside_popup {
            return ClickOutcome::Ignore;
        }
        self.closing = true;
        ClickOutcome::Close
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_click_never_closes() {
        let mut gate = OutsideClickGate::new();
        assert_eq!(gate.on_pointer_down(false), ClickOutcome::Ignore);
        assert!(!gate.is_closing());
    }

    #[test]
    fn test_second_outside_click_closes_once() {
        let mut gate = OutsideClickGate::new();
        gate.on_pointer_down(false);
        assert_eq!(gate.on_pointer_down(false), ClickOutcome::Close);
        assert!(gate.is_closing());
        assert_eq!(gate.on_pointer_down(false), ClickOutcome::Ignore);
    }

    #[test]
    fn test_inside_clicks_keep_popup() {
        let mut gate = OutsideClickGate::new();
        gate.on_pointer_down(true);
        assert_eq!(gate.on_pointer_down(true), ClickOutcome::Ignore);
        assert_eq!(gate.on_pointer_down(false), ClickOutcome::Close);
    }
}
