//! UART0/UART1 wire
//!
//! Both UARTs are claimed at start-up so their pins are muxed, then driven
//! at register level: the bridge reprograms framing and baud rate on every
//! connection cycle, and the receive half is polled from core 1 while the
//! transmit half is used on core 0.
//!
//! | Port  | Peripheral | TX    | RX    |
//! |-------|------------|-------|-------|
//! | USB-C | UART0      | GPIO0 | GPIO1 |
//! | GPIO  | UART1      | GPIO4 | GPIO5 |
//!
//! The active port is published through a single atomic so the receive
//! half follows whatever the transmit half last configured.

use embassy_rp::clocks::clk_peri_freq;
use embassy_rp::pac;
use embassy_rp::peripherals::{PIN_0, PIN_1, PIN_4, PIN_5, UART0, UART1};
use embassy_rp::uart::{Blocking, Config as EmbassyUartConfig, Uart};
use embassy_rp::Peri;
use picoterm_hal::{
    DataBits, Parity, Port, StopBits, UartConfig, UartControl, UartError, UartRx, UartTx,
};
use portable_atomic::{AtomicU8, Ordering};

/// Marker for "no port open"
const NO_PORT: u8 = u8::MAX;

/// Port currently open, shared between the two cores
static ACTIVE: AtomicU8 = AtomicU8::new(NO_PORT);

fn port_index(port: Port) -> u8 {
    match port {
        Port::UsbC => 0,
        Port::Gpio => 1,
    }
}

fn active_port() -> Option<Port> {
    match ACTIVE.load(Ordering::Acquire) {
        0 => Some(Port::UsbC),
        1 => Some(Port::Gpio),
        _ => None,
    }
}

fn regs(port: Port) -> pac::uart::Uart {
    match port {
        Port::UsbC => pac::UART0,
        Port::Gpio => pac::UART1,
    }
}

/// Integer and fractional baud divisors for `baudrate` at `clk_peri` Hz
///
/// Same rounding as the RP2040 SDK. Rates the divisor range can't reach
/// are rejected rather than clamped.
pub fn baud_divisors(clk_peri: u32, baudrate: u32) -> Result<(u16, u8), UartError> {
    if baudrate == 0 {
        return Err(UartError::UnsupportedBaudrate);
    }
    let div = (8 * u64::from(clk_peri)) / u64::from(baudrate);
    let ibrd = div >> 7;
    if ibrd == 0 || ibrd >= 65_535 {
        return Err(UartError::UnsupportedBaudrate);
    }
    let fbrd = ((div & 0x7f) + 1) / 2;
    Ok((ibrd as u16, fbrd as u8))
}

fn wlen(bits: DataBits) -> u8 {
    match bits {
        DataBits::Seven => 0b10,
        DataBits::Eight => 0b11,
    }
}

/// Transmit half and line control
pub struct RpWire {
    _usb: Uart<'static, UART0, Blocking>,
    _gpio: Uart<'static, UART1, Blocking>,
}

impl RpWire {
    /// Claim both UARTs; neither is left enabled
    pub fn new(
        uart0: Peri<'static, UART0>,
        usb_tx: Peri<'static, PIN_0>,
        usb_rx: Peri<'static, PIN_1>,
        uart1: Peri<'static, UART1>,
        gpio_tx: Peri<'static, PIN_4>,
        gpio_rx: Peri<'static, PIN_5>,
    ) -> Self {
        let usb = Uart::new_blocking(uart0, usb_tx, usb_rx, EmbassyUartConfig::default());
        let gpio = Uart::new_blocking(uart1, gpio_tx, gpio_rx, EmbassyUartConfig::default());

        let mut wire = Self {
            _usb: usb,
            _gpio: gpio,
        };
        wire.shutdown(Port::UsbC);
        wire.shutdown(Port::Gpio);
        ACTIVE.store(NO_PORT, Ordering::Release);
        wire
    }

    /// Receive half for the producer context
    pub fn receiver(&self) -> RpWireRx {
        RpWireRx { _private: () }
    }

    fn shutdown(&mut self, port: Port) {
        let r = regs(port);
        while r.uartfr().read().busy() {}
        r.uartcr().write(|w| {
            w.set_uarten(false);
            w.set_txe(false);
            w.set_rxe(false);
        });
    }
}

impl UartTx for RpWire {
    fn write_byte(&mut self, byte: u8) -> Result<(), UartError> {
        let port = active_port().ok_or(UartError::NotConfigured)?;
        let r = regs(port);
        while r.uartfr().read().txff() {}
        r.uartdr().write(|w| w.set_data(byte));
        Ok(())
    }
}

impl UartControl for RpWire {
    fn configure(&mut self, port: Port, config: &UartConfig) -> Result<(), UartError> {
        let (ibrd, fbrd) = baud_divisors(clk_peri_freq(), config.baudrate)?;

        self.deinit();
        let r = regs(port);
        r.uartibrd().write(|w| w.set_baud_divint(ibrd));
        r.uartfbrd().write(|w| w.set_baud_divfrac(fbrd));
        // LCR_H write latches the divisors
        r.uartlcr_h().write(|w| {
            w.set_wlen(wlen(config.data_bits));
            w.set_stp2(config.stop_bits == StopBits::Two);
            w.set_pen(config.parity != Parity::None);
            w.set_eps(config.parity == Parity::Even);
            w.set_fen(true);
        });
        // No flow control, no interrupts
        r.uartimsc().write(|_| {});
        r.uartcr().write(|w| {
            w.set_uarten(true);
            w.set_txe(true);
            w.set_rxe(true);
        });

        ACTIVE.store(port_index(port), Ordering::Release);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "{} open: {} baud (ibrd={}, fbrd={})",
            port.label(),
            config.baudrate,
            ibrd,
            fbrd
        );
        Ok(())
    }

    fn deinit(&mut self) {
        if let Some(port) = active_port() {
            ACTIVE.store(NO_PORT, Ordering::Release);
            self.shutdown(port);
        }
    }
}

/// Receive half, polled from core 1
///
/// Reads whichever port [`RpWire`] last opened; reports nothing while no
/// port is open.
pub struct RpWireRx {
    _private: (),
}

impl UartRx for RpWireRx {
    fn byte_available(&mut self) -> bool {
        match active_port() {
            Some(port) => !regs(port).uartfr().read().rxfe(),
            None => false,
        }
    }

    fn read_byte(&mut self) -> Result<u8, UartError> {
        let port = active_port().ok_or(UartError::NotConfigured)?;
        let dr = regs(port).uartdr().read();
        if dr.oe() {
            Err(UartError::Overrun)
        } else if dr.be() {
            Err(UartError::Break)
        } else if dr.pe() {
            Err(UartError::Parity)
        } else if dr.fe() {
            Err(UartError::Framing)
        } else {
            Ok(dr.data())
        }
    }
}
