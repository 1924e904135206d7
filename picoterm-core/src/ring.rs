//! Single-producer/single-consumer byte ring
//!
//! Carries received bytes from the context that samples the wire to the
//! context that drives the display. Neither side ever blocks or takes a
//! lock.
//!
//! The ring is split into a [`Producer`] and a [`Consumer`]. Only the
//! producer stores `head` and only the consumer stores `tail`, so each index
//! has exactly one writer. A slot is filled before `head` is published with
//! `Release`, and the consumer observes `head` with `Acquire` before reading
//! it, which gives strict FIFO delivery across cores.
//!
//! One slot is always kept free to tell "full" from "empty", so a ring with
//! `N` slots holds at most `N - 1` bytes. When it is full, new bytes are
//! dropped and the oldest data is kept.

use portable_atomic::{AtomicU8, AtomicUsize, Ordering};

use picoterm_hal::UartRx;

/// Fixed-capacity SPSC ring of bytes with `N` slots
///
/// `N` must be a power of two so the indices wrap with a mask.
pub struct ByteRing<const N: usize> {
    slots: [AtomicU8; N],
    /// Next slot to write (owned by the producer)
    head: AtomicUsize,
    /// Next slot to read (owned by the consumer)
    tail: AtomicUsize,
}

impl<const N: usize> ByteRing<N> {
    const MASK: usize = {
        assert!(N >= 2, "ring needs at least two slots");
        assert!(N.is_power_of_two(), "ring size must be a power of two");
        N - 1
    };

    /// Create an empty ring
    pub const fn new() -> Self {
        let _ = Self::MASK;
        Self {
            slots: [const { AtomicU8::new(0) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Number of bytes the ring can hold
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Split into the two halves
    ///
    /// The exclusive borrow guarantees there is only ever one producer and
    /// one consumer for the lifetime of the handles.
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let ring: &Self = self;
        (Producer { ring }, Consumer { ring })
    }

    fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.wrapping_sub(tail) & Self::MASK
    }
}

impl<const N: usize> Default for ByteRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Writing half of a [`ByteRing`]
pub struct Producer<'a, const N: usize> {
    ring: &'a ByteRing<N>,
}

impl<const N: usize> Producer<'_, N> {
    /// Enqueue one byte
    ///
    /// Returns false and drops the byte if the ring is full.
    pub fn write(&mut self, byte: u8) -> bool {
        let head = self.ring.head.load(Ordering::Relaxed);
        let next = (head + 1) & ByteRing::<N>::MASK;
        if next == self.ring.tail.load(Ordering::Acquire) {
            return false;
        }

        self.ring.slots[head].store(byte, Ordering::Relaxed);
        self.ring.head.store(next, Ordering::Release);
        true
    }

    /// Check if unread bytes are waiting
    pub fn has_data(&self) -> bool {
        self.ring.len() != 0
    }

    /// Check if the next write would be dropped
    pub fn is_full(&self) -> bool {
        self.ring.len() == self.ring.capacity()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_data()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }
}

/// Reading half of a [`ByteRing`]
pub struct Consumer<'a, const N: usize> {
    ring: &'a ByteRing<N>,
}

impl<const N: usize> Consumer<'_, N> {
    /// Dequeue the oldest byte, if any
    pub fn try_read(&mut self) -> Option<u8> {
        let tail = self.ring.tail.load(Ordering::Relaxed);
        if tail == self.ring.head.load(Ordering::Acquire) {
            return None;
        }

        let byte = self.ring.slots[tail].load(Ordering::Relaxed);
        self.ring
            .tail
            .store((tail + 1) & ByteRing::<N>::MASK, Ordering::Release);
        Some(byte)
    }

    /// Check if unread bytes are waiting
    pub fn has_data(&self) -> bool {
        self.ring.len() != 0
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_data()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }
}

/// Outcome of one [`pump`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PumpStats {
    /// Bytes stored in the ring
    pub accepted: u32,
    /// Bytes lost because the ring was full
    pub dropped: u32,
    /// NUL bytes discarded as line noise
    pub zero: u32,
    /// Receive errors reported by the UART
    pub errors: u32,
}

impl PumpStats {
    /// Fold another pass into this one
    pub fn add(&mut self, other: PumpStats) {
        self.accepted = self.accepted.wrapping_add(other.accepted);
        self.dropped = self.dropped.wrapping_add(other.dropped);
        self.zero = self.zero.wrapping_add(other.zero);
        self.errors = self.errors.wrapping_add(other.errors);
    }
}

/// Move every byte the UART has waiting into the ring
///
/// This is the producer side of the bridge. It returns as soon as the
/// receiver runs dry and never waits for the consumer: when the ring is
/// full the byte is dropped.
pub fn pump<R: UartRx, const N: usize>(rx: &mut R, producer: &mut Producer<'_, N>) -> PumpStats {
    let mut stats = PumpStats::default();

    while rx.byte_available() {
        match rx.read_byte() {
            Ok(0) => stats.zero += 1,
            Ok(byte) => {
                if producer.write(byte) {
                    stats.accepted += 1;
                } else {
                    stats.dropped += 1;
                }
            }
            Err(_) => stats.errors += 1,
        }
    }

    stats
}
