//! Driver implementations
//!
//! Concrete implementations of the collaborator traits in `picoterm-hal`:
//!
//! - Keyboard: the PicoCalc south-bridge controller on I2C
//! - Bell: a square-wave tone on one or more PWM outputs

#![no_std]
#![deny(unsafe_code)]

pub mod bell;
pub mod keyboard;

pub use bell::{BellConfig, PwmBell};
pub use keyboard::{EmbeddedI2c, SouthBridge};
