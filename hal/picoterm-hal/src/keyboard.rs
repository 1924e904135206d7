//! Keyboard abstractions
//!
//! Key events carry the raw device keycode. Printable keys report their
//! ASCII value, everything else uses the codes in [`keycode`].

/// Keycodes reported by the keyboard controller
pub mod keycode {
    pub const BACKSPACE: u8 = 0x08;
    pub const TAB: u8 = 0x09;
    /// Enter key (the controller reports a line feed)
    pub const ENTER: u8 = 0x0A;
    /// Carriage return
    pub const RETURN: u8 = 0x0D;

    pub const F1: u8 = 0x81;
    pub const F2: u8 = 0x82;
    pub const F3: u8 = 0x83;
    pub const F4: u8 = 0x84;
    pub const F5: u8 = 0x85;
    pub const F6: u8 = 0x86;
    pub const F7: u8 = 0x87;
    pub const F8: u8 = 0x88;
    pub const F9: u8 = 0x89;
    pub const F10: u8 = 0x90;
    pub const POWER: u8 = 0x91;

    pub const MOD_ALT: u8 = 0xA1;
    pub const MOD_SHIFT_LEFT: u8 = 0xA2;
    pub const MOD_SHIFT_RIGHT: u8 = 0xA3;
    pub const MOD_SYM: u8 = 0xA4;
    pub const MOD_CTRL: u8 = 0xA5;

    pub const ESC: u8 = 0xB1;
    pub const LEFT: u8 = 0xB4;
    pub const UP: u8 = 0xB5;
    pub const DOWN: u8 = 0xB6;
    pub const RIGHT: u8 = 0xB7;

    pub const CAPS_LOCK: u8 = 0xC1;

    pub const BREAK: u8 = 0xD0;
    pub const INSERT: u8 = 0xD1;
    pub const HOME: u8 = 0xD2;
    pub const DELETE: u8 = 0xD4;
    pub const END: u8 = 0xD5;
    pub const PAGE_UP: u8 = 0xD6;
    pub const PAGE_DOWN: u8 = 0xD7;
}

/// Transition reported for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyState {
    Pressed,
    /// Key still down after the controller's hold delay
    Held,
    Released,
}

/// A single key transition, consumed once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub code: u8,
    pub state: KeyState,
}

impl KeyEvent {
    pub const fn pressed(code: u8) -> Self {
        Self {
            code,
            state: KeyState::Pressed,
        }
    }

    pub const fn released(code: u8) -> Self {
        Self {
            code,
            state: KeyState::Released,
        }
    }
}

/// Errors from the keyboard controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyboardError {
    /// Bus transaction failed
    Bus,
    /// Controller returned a state byte we don't know
    InvalidState(u8),
}

/// Source of key events
pub trait Keyboard {
    /// Poll for the next key event
    ///
    /// Returns `Ok(Some(event))` if an event is available,
    /// `Ok(None)` if nothing is pending. Never blocks.
    fn poll(&mut self) -> Result<Option<KeyEvent>, KeyboardError>;
}
