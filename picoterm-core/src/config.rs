//! Connection settings
//!
//! The menu writes these one field at a time; the bridge reads them once
//! the menu is done and applies them to the wire.

use core::fmt;

use picoterm_hal::{DataBits, Parity, Port, StopBits, UartConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Field of [`ConnectionConfig`] a menu item controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    Port,
    Baudrate,
    DataBits,
    Parity,
    StopBits,
}

/// Everything needed to bring up the wire for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConnectionConfig {
    pub port: Port,
    pub baudrate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        let uart = UartConfig::default();
        Self {
            port: Port::default(),
            baudrate: uart.baudrate,
            data_bits: uart.data_bits,
            parity: uart.parity,
            stop_bits: uart.stop_bits,
        }
    }
}

impl ConnectionConfig {
    /// Store a menu value into the field named by `setting`
    ///
    /// Values that don't map onto the field are ignored and false is
    /// returned; the field keeps its previous value.
    pub fn set(&mut self, setting: Setting, value: i32) -> bool {
        match setting {
            Setting::Port => Port::from_index(value).map(|p| self.port = p).is_some(),
            Setting::Baudrate => match u32::try_from(value) {
                Ok(baud) if baud > 0 => {
                    self.baudrate = baud;
                    true
                }
                _ => false,
            },
            Setting::DataBits => DataBits::from_bits(value)
                .map(|d| self.data_bits = d)
                .is_some(),
            Setting::Parity => Parity::from_index(value)
                .map(|p| self.parity = p)
                .is_some(),
            Setting::StopBits => StopBits::from_bits(value)
                .map(|s| self.stop_bits = s)
                .is_some(),
        }
    }

    /// Line settings for the selected port
    pub fn uart_config(&self) -> UartConfig {
        UartConfig {
            baudrate: self.baudrate,
            data_bits: self.data_bits,
            parity: self.parity,
            stop_bits: self.stop_bits,
        }
    }
}

/// Formats as `GPIO 115200 8N1`
impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}{}{}",
            self.port.label(),
            self.baudrate,
            self.data_bits.bits(),
            self.parity.letter(),
            self.stop_bits.bits()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_gpio_115200_8n1() {
        let config = ConnectionConfig::default();
        assert_eq!(config.port, Port::Gpio);
        assert_eq!(std::format!("{}", config), "GPIO 115200 8N1");
    }

    #[test]
    fn test_set_each_field() {
        let mut config = ConnectionConfig::default();

        assert!(config.set(Setting::Port, 0));
        assert!(config.set(Setting::Baudrate, 9600));
        assert!(config.set(Setting::DataBits, 7));
        assert!(config.set(Setting::Parity, 1));
        assert!(config.set(Setting::StopBits, 2));

        assert_eq!(std::format!("{}", config), "USB-C 9600 7E2");
        assert_eq!(config.uart_config().baudrate, 9600);
        assert_eq!(config.uart_config().parity, Parity::Even);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let mut config = ConnectionConfig::default();

        assert!(!config.set(Setting::Port, 5));
        assert!(!config.set(Setting::Baudrate, -1));
        assert!(!config.set(Setting::Baudrate, 0));
        assert!(!config.set(Setting::DataBits, 9));
        assert!(!config.set(Setting::Parity, 7));
        assert!(!config.set(Setting::StopBits, 0));

        assert_eq!(config, ConnectionConfig::default());
    }
}
