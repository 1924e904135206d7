//! Core-1 producer loop
//!
//! Core 1 does nothing but move received bytes from the active UART into
//! the ring. It never sleeps; the UART FIFO is only 32 bytes deep and no
//! receive interrupt is enabled.

use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::CORE1;
use embassy_rp::Peri;
use picoterm_core::{pump, Producer, PumpStats};

use crate::uart::RpWireRx;

/// Core-1 stack size in bytes
pub const CORE1_STACK_SIZE: usize = 4096;

/// Start the producer on core 1
pub fn start<const N: usize>(
    core1: Peri<'static, CORE1>,
    stack: &'static mut Stack<CORE1_STACK_SIZE>,
    rx: RpWireRx,
    producer: Producer<'static, N>,
) {
    spawn_core1(core1, stack, move || run(rx, producer));
}

fn run<const N: usize>(mut rx: RpWireRx, mut producer: Producer<'static, N>) -> ! {
    #[cfg(feature = "defmt")]
    defmt::info!("producer running on core 1");

    let mut totals = PumpStats::default();
    loop {
        let stats = pump(&mut rx, &mut producer);
        #[cfg(feature = "defmt")]
        if stats.dropped > 0 || stats.errors > 0 {
            defmt::trace!(
                "rx: {} dropped, {} errors ({} dropped total)",
                stats.dropped,
                stats.errors,
                totals.dropped.wrapping_add(stats.dropped)
            );
        }
        totals.add(stats);
        cortex_m::asm::nop();
    }
}
