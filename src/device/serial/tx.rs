use crate::device::base::{Consumer, Producer, RingBuffer, Slots};
use crate::device::SerialHardware;
use crate::error::SerialError;
use core::sync::atomic::{AtomicBool, Ordering};
use log::{debug, trace};

/// Pending output bytes plus the flag telling whether the interrupt is
/// currently draining them.
///
/// `active` is false only while the buffer is empty and nothing is being
/// shifted out. Only `TxQueue::enqueue` sets it, only `TxDrain` clears it.
pub struct TransmitPath<N: Slots<u8>> {
    ring: RingBuffer<u8, N>,
    active: AtomicBool,
}

impl<N: Slots<u8>> TransmitPath<N> {
    pub fn new() -> Self {
        TransmitPath {
            ring: RingBuffer::new(),
            active: AtomicBool::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn pending(&self) -> usize {
        self.ring.len()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    pub fn split(&mut self) -> (TxQueue<'_, N>, TxDrain<'_, N>) {
        unsafe { self.split_unchecked() }
    }

    /// # Safety
    ///
    /// Same contract as `RingBuffer::split_unchecked`.
    pub(crate) unsafe fn split_unchecked(&self) -> (TxQueue<'_, N>, TxDrain<'_, N>) {
        let (producer, consumer) = self.ring.split_unchecked();
        (
            TxQueue {
                producer,
                active: &self.active,
            },
            TxDrain {
                consumer,
                active: &self.active,
            },
        )
    }

    pub(crate) fn reset(&mut self) {
        self.ring.clean();
        self.active.store(false, Ordering::Release);
    }
}

impl<N: Slots<u8>> Default for TransmitPath<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mainline half of the transmit path.
pub struct TxQueue<'a, N: Slots<u8>> {
    producer: Producer<'a, u8, N>,
    active: &'a AtomicBool,
}

impl<'a, N: Slots<u8>> TxQueue<'a, N> {
    /// Queues one byte without blocking.
    ///
    /// When the channel was idle, the hardware is asked to raise its
    /// transmit-ready condition so the interrupt starts draining.
    pub fn enqueue<H: SerialHardware>(&mut self, hw: &H, byte: u8) -> Result<(), SerialError> {
        self.producer.try_push(byte).map_err(SerialError::BufferFull)?;
        if !self.active.load(Ordering::Acquire) {
            self.active.store(true, Ordering::Release);
            trace!("uart tx: start transmission");
            hw.request_transmit();
        }
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.producer.is_full()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn pending(&self) -> usize {
        self.producer.len()
    }

    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }
}

/// Interrupt half of the transmit path.
pub struct TxDrain<'a, N: Slots<u8>> {
    consumer: Consumer<'a, u8, N>,
    active: &'a AtomicBool,
}

impl<'a, N: Slots<u8>> TxDrain<'a, N> {
    /// Moves the next pending byte into the transmit register, or marks the
    /// channel idle when nothing is left.
    pub fn on_transmit_ready<H: SerialHardware>(&mut self, hw: &H) {
        match self.consumer.try_pop() {
            Some(byte) => hw.write_data(byte),
            None => {
                self.active.store(false, Ordering::Release);
                debug!("uart tx: buffer drained, transmitter idle");
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::sim::SimUart;
    use typenum::U4;

    #[test]
    fn first_enqueue_arms_the_transmitter_once() {
        let hw = SimUart::new();
        let mut path: TransmitPath<U4> = TransmitPath::new();
        let (mut q, _drain) = path.split();

        assert!(!q.is_active());
        q.enqueue(&hw, b'a').unwrap();
        assert!(q.is_active());
        assert_eq!(hw.tx_requests(), 1);

        q.enqueue(&hw, b'b').unwrap();
        assert_eq!(hw.tx_requests(), 1);
        assert_eq!(q.pending(), 2);
    }

    #[test]
    fn full_buffer_rejects_and_hands_byte_back() {
        let hw = SimUart::new();
        let mut path: TransmitPath<U4> = TransmitPath::new();
        let (mut q, _drain) = path.split();
        for b in 0..3 {
            q.enqueue(&hw, b).unwrap();
        }
        assert!(q.is_full());
        assert_eq!(q.enqueue(&hw, 3), Err(SerialError::BufferFull(3)));
        assert_eq!(q.pending(), 3);
    }

    #[test]
    fn drain_clears_active_only_when_found_empty() {
        let hw = SimUart::new();
        let mut path: TransmitPath<U4> = TransmitPath::new();
        let (mut q, mut drain) = path.split();
        q.enqueue(&hw, 1).unwrap();
        q.enqueue(&hw, 2).unwrap();

        drain.on_transmit_ready(&hw);
        assert!(drain.is_active());
        drain.on_transmit_ready(&hw);
        assert!(drain.is_active());
        drain.on_transmit_ready(&hw);
        assert!(!drain.is_active());

        assert_eq!(hw.take_sent(), Some(1));
        assert_eq!(hw.take_sent(), Some(2));
        assert_eq!(hw.take_sent(), None);
    }

    #[test]
    fn enqueue_after_idle_rearms() {
        let hw = SimUart::new();
        let mut path: TransmitPath<U4> = TransmitPath::new();
        let (mut q, mut drain) = path.split();
        q.enqueue(&hw, 1).unwrap();
        drain.on_transmit_ready(&hw);
        drain.on_transmit_ready(&hw);
        assert!(!q.is_active());

        q.enqueue(&hw, 2).unwrap();
        assert!(q.is_active());
        assert_eq!(hw.tx_requests(), 2);
    }
}
