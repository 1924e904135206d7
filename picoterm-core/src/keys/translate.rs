//! Key to wire translation
//!
//! Navigation and function keys become the xterm/VT220 sequences most
//! hosts expect; letters pick up Control and Shift; everything else goes
//! out as its raw byte.

use heapless::Vec;
use picoterm_hal::keyboard::keycode;

use super::Modifiers;

/// Longest sequence a single key produces (`ESC [ 1 5 ~`)
pub const MAX_SEQUENCE_LEN: usize = 5;

/// Result of translating one key
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Translation {
    /// Bytes to send on the wire, in order
    Bytes(Vec<u8, MAX_SEQUENCE_LEN>),
    /// Key produces nothing on the wire
    Suppressed,
}

impl Translation {
    fn byte(byte: u8) -> Self {
        let mut bytes = Vec::new();
        // Capacity is at least one
        let _ = bytes.push(byte);
        Translation::Bytes(bytes)
    }

    fn sequence(seq: &[u8]) -> Self {
        Translation::Bytes(Vec::from_slice(seq).unwrap_or_default())
    }

    /// Bytes to send, empty when suppressed
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Translation::Bytes(bytes) => bytes.as_slice(),
            Translation::Suppressed => &[],
        }
    }
}

/// Stateless key translator
///
/// Modifier state is passed in explicitly; see [`super::ModifierTracker`].
pub struct KeyTranslator;

impl KeyTranslator {
    /// Translate a pressed, non-modifier key
    pub fn translate(code: u8, modifiers: Modifiers) -> Translation {
        if code.is_ascii_lowercase() {
            // Shift wins: Ctrl+Shift+letter sends the capital letter
            let byte = if modifiers.shift {
                code & !0x20
            } else if modifiers.control {
                code & 0x1F
            } else {
                code
            };
            return Translation::byte(byte);
        }

        match code {
            keycode::ENTER => Translation::byte(keycode::RETURN),
            keycode::CAPS_LOCK | keycode::BREAK | keycode::POWER => Translation::Suppressed,
            _ => match escape_sequence(code) {
                Some(seq) => Translation::sequence(seq),
                None => Translation::byte(code),
            },
        }
    }
}

/// Fixed sequences for navigation and function keys
fn escape_sequence(code: u8) -> Option<&'static [u8]> {
    let seq: &'static [u8] = match code {
        keycode::DELETE => b"\x7f",
        keycode::ESC => b"\x1b",
        keycode::HOME => b"\x1b[H",
        keycode::END => b"\x1b[F",
        keycode::UP => b"\x1b[A",
        keycode::DOWN => b"\x1b[B",
        keycode::RIGHT => b"\x1b[C",
        keycode::LEFT => b"\x1b[D",
        keycode::F1 => b"\x1bOP",
        keycode::F2 => b"\x1bOQ",
        keycode::F3 => b"\x1bOR",
        keycode::F4 => b"\x1bOS",
        keycode::F5 => b"\x1b[15~",
        keycode::F6 => b"\x1b[17~",
        keycode::F7 => b"\x1b[18~",
        keycode::F8 => b"\x1b[19~",
        keycode::F9 => b"\x1b[20~",
        keycode::F10 => b"\x1b[21~",
        _ => return None,
    };
    Some(seq)
}
