//! Keyboard drivers

pub mod southbridge;

pub use southbridge::{EmbeddedI2c, SouthBridge};
