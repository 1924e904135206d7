//! UART serial communication abstractions
//!
//! The wire is split the way the bridge uses it: the receive half lives
//! in the producer context and is polled without blocking, the transmit
//! half and the line control live in the foreground context.

/// Errors reported by a UART implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// No port is configured (between cycles)
    NotConfigured,
    /// Framing error
    Framing,
    /// Parity error
    Parity,
    /// Line break detected
    Break,
    /// Hardware FIFO overrun
    Overrun,
    /// Baud rate cannot be generated from the peripheral clock
    UnsupportedBaudrate,
}

/// UART transmitter
pub trait UartTx {
    /// Write a single byte, waiting for room in the hardware FIFO
    fn write_byte(&mut self, byte: u8) -> Result<(), UartError>;

    /// Write every byte of `data`, stopping at the first error
    fn write_all(&mut self, data: &[u8]) -> Result<(), UartError> {
        for &byte in data {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

/// UART receiver
///
/// Never blocks: the producer context must keep up with line rate.
pub trait UartRx {
    /// Check if at least one received byte is waiting
    fn byte_available(&mut self) -> bool;

    /// Read the next received byte
    ///
    /// Only meaningful after [`UartRx::byte_available`] returned true.
    fn read_byte(&mut self) -> Result<u8, UartError>;

    /// Read a byte if one is waiting
    fn try_read(&mut self) -> Result<Option<u8>, UartError> {
        if self.byte_available() {
            self.read_byte().map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Line control for the active port
pub trait UartControl {
    /// Select `port` and program it with `config`
    fn configure(&mut self, port: Port, config: &UartConfig) -> Result<(), UartError>;

    /// Shut down the active port
    fn deinit(&mut self);
}

/// Physical port the wire is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Port {
    /// USB-C connector (UART0 behind the USB bridge chip)
    UsbC,
    /// GPIO header (UART1, GP4 = TX, GP5 = RX)
    #[default]
    Gpio,
}

impl Port {
    /// Label shown to the user
    pub const fn label(self) -> &'static str {
        match self {
            Port::UsbC => "USB-C",
            Port::Gpio => "GPIO",
        }
    }

    /// Map a menu value to a port
    pub const fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Port::UsbC),
            1 => Some(Port::Gpio),
            _ => None,
        }
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataBits {
    Seven,
    Eight,
}

impl DataBits {
    /// Bit count
    pub const fn bits(self) -> u8 {
        match self {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }

    pub const fn from_bits(bits: i32) -> Option<Self> {
        match bits {
            7 => Some(DataBits::Seven),
            8 => Some(DataBits::Eight),
            _ => None,
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    None,
    Even,
    Odd,
}

impl Parity {
    /// Single-letter form used in "8N1" style summaries
    pub const fn letter(self) -> char {
        match self {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        }
    }

    /// Map a menu value (0 = none, 1 = even, 2 = odd) to a parity mode
    pub const fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Parity::None),
            1 => Some(Parity::Even),
            2 => Some(Parity::Odd),
            _ => None,
        }
    }
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopBits {
    One,
    Two,
}

impl StopBits {
    pub const fn bits(self) -> u8 {
        match self {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }

    pub const fn from_bits(bits: i32) -> Option<Self> {
        match bits {
            1 => Some(StopBits::One),
            2 => Some(StopBits::Two),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_115200_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 115200);
        assert_eq!(config.data_bits.bits(), 8);
        assert_eq!(config.parity.letter(), 'N');
        assert_eq!(config.stop_bits.bits(), 1);
    }

    #[test]
    fn test_menu_value_mapping() {
        assert_eq!(Port::from_index(0), Some(Port::UsbC));
        assert_eq!(Port::from_index(1), Some(Port::Gpio));
        assert_eq!(Port::from_index(2), None);
        assert_eq!(Parity::from_index(1), Some(Parity::Even));
        assert_eq!(Parity::from_index(3), None);
        assert_eq!(DataBits::from_bits(7), Some(DataBits::Seven));
        assert_eq!(DataBits::from_bits(9), None);
        assert_eq!(StopBits::from_bits(2), Some(StopBits::Two));
    }

    struct VecTx {
        sent: [u8; 8],
        len: usize,
        fail_at: Option<usize>,
    }

    impl UartTx for VecTx {
        fn write_byte(&mut self, byte: u8) -> Result<(), UartError> {
            if self.fail_at == Some(self.len) {
                return Err(UartError::NotConfigured);
            }
            self.sent[self.len] = byte;
            self.len += 1;
            Ok(())
        }
    }

    #[test]
    fn test_write_all_stops_at_first_error() {
        let mut tx = VecTx {
            sent: [0; 8],
            len: 0,
            fail_at: Some(2),
        };
        assert_eq!(tx.write_all(b"abcd"), Err(UartError::NotConfigured));
        assert_eq!(&tx.sent[..tx.len], b"ab");
    }

    struct OneByte(Option<u8>);

    impl UartRx for OneByte {
        fn byte_available(&mut self) -> bool {
            self.0.is_some()
        }

        fn read_byte(&mut self) -> Result<u8, UartError> {
            self.0.take().ok_or(UartError::Overrun)
        }
    }

    #[test]
    fn test_try_read_is_non_blocking() {
        let mut rx = OneByte(Some(b'x'));
        assert_eq!(rx.try_read(), Ok(Some(b'x')));
        assert_eq!(rx.try_read(), Ok(None));
    }
}
