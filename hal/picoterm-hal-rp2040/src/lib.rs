//! RP2040 implementation of the PicoTerm hardware traits
//!
//! This crate binds the board-agnostic terminal to the PicoCalc:
//!
//! - Wire: UART0 (USB-C) and UART1 (GPIO header), reprogrammed per session
//! - Keyboard: south-bridge controller on I2C1
//! - Bell: audio PWM on GPIO26/27
//! - Producer: receive loop pinned to core 1
//!
//! The display is supplied by the application.

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod peripherals;
pub mod producer;
pub mod uart;

pub use board::{Board, RING_SIZE};
pub use peripherals::{Keyboard, SetupError, Speaker};
pub use uart::{RpWire, RpWireRx};
