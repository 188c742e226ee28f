use crate::device::base::{Consumer, Producer, RingBuffer, Slots};
use core::sync::atomic::{AtomicUsize, Ordering};
use log::debug;

/// Received bytes waiting for the application.
///
/// A byte that arrives while the buffer is full is dropped, never written
/// over older data. Drops are counted.
pub struct ReceivePath<N: Slots<u8>> {
    ring: RingBuffer<u8, N>,
    dropped: AtomicUsize,
}

impl<N: Slots<u8>> ReceivePath<N> {
    pub fn new() -> Self {
        ReceivePath {
            ring: RingBuffer::new(),
            dropped: AtomicUsize::new(0),
        }
    }

    pub fn available(&self) -> usize {
        self.ring.len()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    pub fn overflow_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    pub(crate) fn reset_overflow_count(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    pub fn split(&mut self) -> (RxFill<'_, N>, RxQueue<'_, N>) {
        unsafe { self.split_unchecked() }
    }

    /// # Safety
    ///
    /// Same contract as `RingBuffer::split_unchecked`.
    pub(crate) unsafe fn split_unchecked(&self) -> (RxFill<'_, N>, RxQueue<'_, N>) {
        let (producer, consumer) = self.ring.split_unchecked();
        (
            RxFill {
                producer,
                dropped: &self.dropped,
            },
            RxQueue {
                consumer,
                dropped: &self.dropped,
            },
        )
    }

    pub(crate) fn reset(&mut self) {
        self.ring.clean();
        self.reset_overflow_count();
    }
}

impl<N: Slots<u8>> Default for ReceivePath<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt half of the receive path.
pub struct RxFill<'a, N: Slots<u8>> {
    producer: Producer<'a, u8, N>,
    dropped: &'a AtomicUsize,
}

impl<'a, N: Slots<u8>> RxFill<'a, N> {
    pub fn on_byte_received(&mut self, byte: u8) {
        if self.producer.try_push(byte).is_err() {
            let lost = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("uart rx: buffer full, dropped byte {:#04x} ({} lost)", byte, lost);
        }
    }
}

/// Mainline half of the receive path.
pub struct RxQueue<'a, N: Slots<u8>> {
    consumer: Consumer<'a, u8, N>,
    dropped: &'a AtomicUsize,
}

impl<'a, N: Slots<u8>> RxQueue<'a, N> {
    pub fn dequeue(&mut self) -> Option<u8> {
        self.consumer.try_pop()
    }

    pub fn available(&self) -> usize {
        self.consumer.len()
    }

    pub fn overflow_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typenum::U4;

    #[test]
    fn bytes_come_out_in_arrival_order() {
        let mut path: ReceivePath<U4> = ReceivePath::new();
        let (mut fill, mut queue) = path.split();
        assert_eq!(queue.dequeue(), None);
        fill.on_byte_received(0x10);
        fill.on_byte_received(0xFF);
        assert_eq!(queue.available(), 2);
        assert_eq!(queue.dequeue(), Some(0x10));
        assert_eq!(queue.dequeue(), Some(0xFF));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn overflow_drops_new_bytes_and_counts_them() {
        let mut path: ReceivePath<U4> = ReceivePath::new();
        {
            let (mut fill, mut queue) = path.split();
            for b in 1..=3 {
                fill.on_byte_received(b);
            }
            fill.on_byte_received(4);
            fill.on_byte_received(5);
            assert_eq!(queue.overflow_count(), 2);

            assert_eq!(queue.dequeue(), Some(1));
            assert_eq!(queue.dequeue(), Some(2));
            assert_eq!(queue.dequeue(), Some(3));
            assert_eq!(queue.dequeue(), None);
        }
        path.reset();
        assert_eq!(path.overflow_count(), 0);
        assert_eq!(path.available(), 0);
    }
}
