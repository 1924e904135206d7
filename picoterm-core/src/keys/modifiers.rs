//! Modifier key state

use picoterm_hal::keyboard::keycode;

/// Snapshot of the held modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        control: false,
        shift: false,
        alt: false,
    };

    pub const CONTROL: Self = Self {
        control: true,
        shift: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        control: false,
        shift: true,
        alt: false,
    };
}

/// Tracks Control, Shift and Alt from press/release events
///
/// A modifier stays held until its release arrives; there is no timeout.
#[derive(Debug, Clone, Default)]
pub struct ModifierTracker {
    held: Modifiers,
}

impl ModifierTracker {
    pub const fn new() -> Self {
        Self {
            held: Modifiers::NONE,
        }
    }

    /// Update the state for one key transition
    ///
    /// Returns true if `code` is a modifier key. Any other key leaves the
    /// state untouched and should be passed on to the translator.
    pub fn on_event(&mut self, code: u8, pressed: bool) -> bool {
        match code {
            keycode::MOD_CTRL => self.held.control = pressed,
            keycode::MOD_SHIFT_LEFT | keycode::MOD_SHIFT_RIGHT => self.held.shift = pressed,
            keycode::MOD_ALT => self.held.alt = pressed,
            _ => return false,
        }
        true
    }

    /// Current modifier state
    pub fn snapshot(&self) -> Modifiers {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_press_release() {
        let mut tracker = ModifierTracker::new();

        assert!(tracker.on_event(keycode::MOD_CTRL, true));
        assert!(tracker.snapshot().control);

        assert!(tracker.on_event(keycode::MOD_CTRL, false));
        assert_eq!(tracker.snapshot(), Modifiers::NONE);
    }

    #[test]
    fn test_either_shift_key() {
        let mut tracker = ModifierTracker::new();

        tracker.on_event(keycode::MOD_SHIFT_LEFT, true);
        assert!(tracker.snapshot().shift);
        tracker.on_event(keycode::MOD_SHIFT_RIGHT, false);
        assert!(!tracker.snapshot().shift);

        tracker.on_event(keycode::MOD_SHIFT_RIGHT, true);
        assert_eq!(tracker.snapshot(), Modifiers::SHIFT);
    }

    #[test]
    fn test_alt_is_tracked() {
        let mut tracker = ModifierTracker::new();
        tracker.on_event(keycode::MOD_ALT, true);
        assert!(tracker.snapshot().alt);
        assert!(!tracker.snapshot().control);
    }

    #[test]
    fn test_other_keys_change_nothing() {
        let mut tracker = ModifierTracker::new();
        tracker.on_event(keycode::MOD_CTRL, true);

        for code in [b'a', b'Z', keycode::BREAK, keycode::MOD_SYM, keycode::CAPS_LOCK] {
            assert!(!tracker.on_event(code, true));
            assert!(!tracker.on_event(code, false));
        }
        assert_eq!(tracker.snapshot(), Modifiers::CONTROL);
    }

    #[test]
    fn test_stuck_modifier_persists() {
        let mut tracker = ModifierTracker::new();
        tracker.on_event(keycode::MOD_CTRL, true);
        for _ in 0..100 {
            tracker.on_event(b'x', true);
            tracker.on_event(b'x', false);
        }
        assert!(tracker.snapshot().control);
    }
}
