//! PicoCalc south-bridge keyboard
//!
//! The keyboard is scanned by a separate microcontroller that sits on the
//! I2C bus and queues key events in a FIFO. Each read of the FIFO register
//! pops one entry:
//!
//! ```text
//! write [REG_FIFO]  ->  read [state, code]
//!
//! state: 0 = empty, 1 = pressed, 2 = held, 3 = released
//! ```

use embedded_hal::i2c::I2c;
use picoterm_hal::{I2cBus, KeyEvent, KeyState, Keyboard, KeyboardError};

/// South-bridge I2C address
pub const ADDRESS: u8 = 0x1F;

/// Register definitions
pub mod reg {
    /// Key event FIFO, two bytes per entry
    pub const FIFO: u8 = 0x09;
}

/// FIFO state byte values
mod state {
    pub const EMPTY: u8 = 0;
    pub const PRESSED: u8 = 1;
    pub const HELD: u8 = 2;
    pub const RELEASED: u8 = 3;
}

/// Keyboard source backed by the south-bridge FIFO
pub struct SouthBridge<I> {
    bus: I,
    address: u8,
}

impl<I: I2cBus> SouthBridge<I> {
    /// Create a driver at the default address
    pub fn new(bus: I) -> Self {
        Self::with_address(bus, ADDRESS)
    }

    pub fn with_address(bus: I, address: u8) -> Self {
        Self { bus, address }
    }

    /// Give the bus back
    pub fn release(self) -> I {
        self.bus
    }

    /// Pop one raw `[state, code]` entry off the FIFO
    fn read_fifo(&mut self) -> Result<[u8; 2], KeyboardError> {
        let mut entry = [0u8; 2];
        self.bus
            .write_read(self.address, &[reg::FIFO], &mut entry)
            .map_err(|_| KeyboardError::Bus)?;
        Ok(entry)
    }
}

impl<I: I2cBus> Keyboard for SouthBridge<I> {
    fn poll(&mut self) -> Result<Option<KeyEvent>, KeyboardError> {
        let [state, code] = self.read_fifo()?;
        let state = match state {
            state::EMPTY => return Ok(None),
            state::PRESSED => KeyState::Pressed,
            state::HELD => KeyState::Held,
            state::RELEASED => KeyState::Released,
            other => {
                #[cfg(feature = "defmt")]
                defmt::warn!("south bridge: unknown key state {}", other);
                return Err(KeyboardError::InvalidState(other));
            }
        };
        Ok(Some(KeyEvent { code, state }))
    }
}

/// Adapter exposing any `embedded-hal` I2C master as an [`I2cBus`]
pub struct EmbeddedI2c<T>(pub T);

impl<T: I2c> I2cBus for EmbeddedI2c<T> {
    type Error = T::Error;

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.0.write_read(address, write_data, read_buf)
    }
}
