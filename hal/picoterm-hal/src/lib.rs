//! PicoTerm Hardware Abstraction Layer
//!
//! This crate defines the capabilities the terminal core is built on. The
//! chip-specific crates implement them for real peripherals, the tests in
//! the other crates implement them with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  picoterm-core (bridge, menu, keys)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  picoterm-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ picoterm-     │       │ picoterm-hal- │
//! │   drivers     │       │    rp2040     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`], [`uart::UartControl`] - The wire
//! - [`keyboard::Keyboard`] - Key event source
//! - [`display::DisplaySink`], [`display::TerminalCallbacks`], [`display::Bell`] - Screen and audio
//! - [`i2c::I2cBus`] - I2C bus operations

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod i2c;
pub mod keyboard;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use display::{Bell, DisplaySink, TerminalCallbacks};
pub use i2c::I2cBus;
pub use keyboard::{KeyEvent, KeyState, Keyboard, KeyboardError};
pub use uart::{
    DataBits, Parity, Port, StopBits, UartConfig, UartControl, UartError, UartRx, UartTx,
};
