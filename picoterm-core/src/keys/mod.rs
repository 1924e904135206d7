//! Keyboard handling
//!
//! Raw key events go through the [`ModifierTracker`] first. Everything it
//! does not consume is handed to [`KeyTranslator`] together with a
//! snapshot of the modifiers, which produces the bytes for the wire.

pub mod modifiers;
pub mod translate;

pub use modifiers::{ModifierTracker, Modifiers};
pub use translate::{KeyTranslator, Translation, MAX_SEQUENCE_LEN};
