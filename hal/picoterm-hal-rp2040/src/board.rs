//! PicoCalc board assembly
//!
//! Takes the embassy peripherals and returns everything the bridge needs
//! except the display, with the producer already running on core 1.
//!
//! ```ignore
//! let p = embassy_rp::init(Default::default());
//! let board = Board::init(p)?;
//! let mut bridge = Bridge::new(board.wire, board.keyboard, display, board.bell, board.inbound);
//! bridge.run(&mut ConfigMenu::with_defaults());
//! ```

use embassy_rp::multicore::Stack;
use embassy_rp::Peripherals;
use picoterm_core::{ByteRing, Consumer};
use picoterm_drivers::BellConfig;
use picoterm_hal::i2c::I2cConfig;
use static_cell::StaticCell;

use crate::peripherals::{self, Keyboard, SetupError, Speaker};
use crate::producer::{self, CORE1_STACK_SIZE};
use crate::uart::RpWire;

/// Slots in the receive ring; holds `RING_SIZE - 1` bytes
pub const RING_SIZE: usize = 4096;

static RING: StaticCell<ByteRing<RING_SIZE>> = StaticCell::new();
static CORE1_STACK: StaticCell<Stack<CORE1_STACK_SIZE>> = StaticCell::new();

/// Board collaborators ready to hand to the bridge
pub struct Board {
    pub wire: RpWire,
    pub keyboard: Keyboard,
    pub bell: Speaker,
    /// Reading half of the receive ring
    pub inbound: Consumer<'static, RING_SIZE>,
}

impl Board {
    /// Bring up the board and start core 1
    ///
    /// Call once: the ring and the core-1 stack are claimed here.
    pub fn init(p: Peripherals) -> Result<Self, SetupError> {
        let keyboard = peripherals::keyboard(p.I2C1, p.PIN_7, p.PIN_6, &I2cConfig::STANDARD);
        let bell = peripherals::speaker(p.PWM_SLICE5, p.PIN_26, p.PIN_27, BellConfig::default())?;
        let wire = RpWire::new(p.UART0, p.PIN_0, p.PIN_1, p.UART1, p.PIN_4, p.PIN_5);

        let ring = RING.init(ByteRing::new());
        let (producer, inbound) = ring.split();
        producer::start(
            p.CORE1,
            CORE1_STACK.init(Stack::new()),
            wire.receiver(),
            producer,
        );

        #[cfg(feature = "defmt")]
        defmt::info!("board up, ring holds {} bytes", inbound.capacity());

        Ok(Self {
            wire,
            keyboard,
            bell,
            inbound,
        })
    }
}
