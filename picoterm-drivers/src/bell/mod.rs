//! Bell drivers

pub mod pwm;

pub use pwm::{BellConfig, PwmBell};
