//! Board-agnostic core of the serial terminal
//!
//! This crate contains all terminal logic that does not depend on
//! specific hardware implementations:
//!
//! - Lock-free SPSC byte ring between the wire sampler and the foreground
//! - Modifier tracking and key-to-escape-sequence translation
//! - Interactive connection menu
//! - The bridge loop tying keyboard, display and wire together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod console;
pub mod keys;
pub mod menu;
pub mod ring;

pub use bridge::{Bridge, BridgeState, Inbound, Phase};
pub use config::{ConnectionConfig, Setting};
pub use keys::{KeyTranslator, ModifierTracker, Modifiers, Translation};
pub use menu::{ConfigMenu, MenuItem, MenuStatus, MenuValue};
pub use ring::{pump, ByteRing, Consumer, Producer, PumpStats};
