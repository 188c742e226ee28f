//! Basic data structures shared by the serial paths.
//!
//! `RingBuffer` is a fixed, non-growable circular queue. One slot of the
//! backing store is always left unused so that a full queue can be told apart
//! from an empty one without a separate counter: an `N`-slot store holds at
//! most `N - 1` values.
//!
//! The queue is single-producer/single-consumer. Exclusive access (`&mut self`)
//! gives the plain `try_push`/`try_pop` API; `split` hands out one `Producer` and
//! one `Consumer` that may live in different execution contexts (mainline code
//! and an interrupt handler).

use core::cell::UnsafeCell;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use generic_array::{ArrayLength, GenericArray};
use typenum::NonZero;

pub type Slot<T> = UnsafeCell<Option<T>>;

/// Slot count of a ring buffer: any non-zero `typenum` length.
pub trait Slots<T>: ArrayLength<Slot<T>> + NonZero {}

impl<T, N: ArrayLength<Slot<T>> + NonZero> Slots<T> for N {}

pub struct RingBuffer<T, N: Slots<T>> {
    data: GenericArray<Slot<T>, N>,
    // written only by the producer
    write: AtomicUsize,
    // written only by the consumer
    read: AtomicUsize,
}

// Slots are only touched through the producer/consumer discipline below: the
// producer owns the slot at `write`, the consumer owns the slot at `read`.
unsafe impl<T: Send, N: Slots<T>> Sync for RingBuffer<T, N> {}

impl<T, N: Slots<T>> RingBuffer<T, N> {
    pub fn new() -> RingBuffer<T, N> {
        RingBuffer {
            data: GenericArray::default(),
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
        }
    }

    /// Number of values the queue can hold, `N - 1`.
    pub fn capacity(&self) -> usize {
        N::USIZE - 1
    }

    #[inline]
    fn advance(index: usize) -> usize {
        if index + 1 == N::USIZE {
            0
        } else {
            index + 1
        }
    }

    pub fn len(&self) -> usize {
        let w = self.write.load(Ordering::Acquire);
        let r = self.read.load(Ordering::Acquire);
        (w + N::USIZE - r) % N::USIZE
    }

    pub fn free_len(&self) -> usize {
        self.capacity() - self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.write.load(Ordering::Acquire) == self.read.load(Ordering::Acquire)
    }

    pub fn is_full(&self) -> bool {
        Self::advance(self.write.load(Ordering::Acquire)) == self.read.load(Ordering::Acquire)
    }

    /// Drops every buffered value and moves both indices back to the start.
    pub fn clean(&mut self) {
        while self.try_pop().is_some() {}
        self.write.store(0, Ordering::Relaxed);
        self.read.store(0, Ordering::Relaxed);
    }

    pub fn try_push(&mut self, val: T) -> Result<(), T> {
        // `&mut self` rules out any other producer or consumer
        unsafe { self.push_shared(val) }
    }

    pub fn try_pop(&mut self) -> Option<T> {
        unsafe { self.pop_shared() }
    }

    pub fn split(&mut self) -> (Producer<'_, T, N>, Consumer<'_, T, N>) {
        unsafe { self.split_unchecked() }
    }

    /// Hands out a producer/consumer pair through a shared reference.
    ///
    /// # Safety
    ///
    /// At most one `Producer` and one `Consumer` of this buffer may be alive at
    /// any time, and no `&mut` access may happen while they are.
    pub(crate) unsafe fn split_unchecked(&self) -> (Producer<'_, T, N>, Consumer<'_, T, N>) {
        (Producer { ring: self }, Consumer { ring: self })
    }

    // Caller must be the only producer.
    unsafe fn push_shared(&self, val: T) -> Result<(), T> {
        let w = self.write.load(Ordering::Relaxed);
        let next = Self::advance(w);
        if next == self.read.load(Ordering::Acquire) {
            return Err(val);
        }
        *self.data[w].get() = Some(val);
        // publish the slot only after it has been written
        self.write.store(next, Ordering::Release);
        Ok(())
    }

    // Caller must be the only consumer.
    unsafe fn pop_shared(&self) -> Option<T> {
        let r = self.read.load(Ordering::Relaxed);
        if r == self.write.load(Ordering::Acquire) {
            return None;
        }
        let val = (*self.data[r].get()).take();
        self.read.store(Self::advance(r), Ordering::Release);
        val
    }
}

impl<T, N: Slots<T>> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, N: Slots<T>> fmt::Debug for RingBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Writing end of a split `RingBuffer`.
pub struct Producer<'a, T, N: Slots<T>> {
    ring: &'a RingBuffer<T, N>,
}

impl<'a, T, N: Slots<T>> Producer<'a, T, N> {
    /// Stores `val` unless the queue is full, in which case it is handed back
    /// and nothing changes.
    pub fn try_push(&mut self, val: T) -> Result<(), T> {
        unsafe { self.ring.push_shared(val) }
    }

    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn free_len(&self) -> usize {
        self.ring.free_len()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }
}

/// Reading end of a split `RingBuffer`.
pub struct Consumer<'a, T, N: Slots<T>> {
    ring: &'a RingBuffer<T, N>,
}

impl<'a, T, N: Slots<T>> Consumer<'a, T, N> {
    pub fn try_pop(&mut self) -> Option<T> {
        unsafe { self.ring.pop_shared() }
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typenum::{U1, U4, U8};

    #[test]
    fn new_buffer_is_empty() {
        let rb: RingBuffer<u8, U8> = RingBuffer::new();
        assert!(rb.is_empty());
        assert!(!rb.is_full());
        assert_eq!(rb.capacity(), 7);
        assert_eq!(rb.len(), 0);
        assert_eq!(rb.free_len(), 7);
    }

    #[test]
    fn eight_slot_scenario() {
        let mut rb: RingBuffer<u8, U8> = RingBuffer::new();
        for b in 1..=7 {
            assert_eq!(rb.try_push(b), Ok(()));
        }
        assert!(rb.is_full());
        assert_eq!(rb.try_push(8), Err(8));
        assert_eq!(rb.try_pop(), Some(1));
        assert_eq!(rb.try_push(8), Ok(()));
        for b in 2..=7 {
            assert_eq!(rb.try_pop(), Some(b));
        }
        assert_eq!(rb.try_pop(), Some(8));
        assert_eq!(rb.try_pop(), None);
        assert!(rb.is_empty());
    }

    #[test]
    fn rejected_push_leaves_state_alone() {
        let mut rb: RingBuffer<u8, U4> = RingBuffer::new();
        rb.try_push(10).unwrap();
        rb.try_pop().unwrap();
        for b in 0..3 {
            rb.try_push(b).unwrap();
        }
        let read_before = rb.read.load(Ordering::Relaxed);
        let write_before = rb.write.load(Ordering::Relaxed);

        assert_eq!(rb.try_push(99), Err(99));
        assert!(rb.is_full());
        assert_eq!(rb.read.load(Ordering::Relaxed), read_before);
        assert_eq!(rb.write.load(Ordering::Relaxed), write_before);
        assert_eq!(rb.try_pop(), Some(0));
    }

    #[test]
    fn indices_wrap_around_the_store() {
        let mut rb: RingBuffer<u8, U4> = RingBuffer::new();
        for round in 0..10u8 {
            rb.try_push(round).unwrap();
            rb.try_push(round.wrapping_add(100)).unwrap();
            assert_eq!(rb.len(), 2);
            assert_eq!(rb.try_pop(), Some(round));
            assert_eq!(rb.try_pop(), Some(round.wrapping_add(100)));
        }
        assert!(rb.is_empty());
    }

    #[test]
    fn single_slot_store_holds_nothing() {
        let mut rb: RingBuffer<u8, U1> = RingBuffer::new();
        assert_eq!(rb.capacity(), 0);
        assert!(rb.is_empty());
        assert!(rb.is_full());
        assert_eq!(rb.try_push(1), Err(1));
    }

    #[test]
    fn clean_resets_indices() {
        let mut rb: RingBuffer<u8, U4> = RingBuffer::new();
        rb.try_push(1).unwrap();
        rb.try_push(2).unwrap();
        rb.try_pop().unwrap();
        rb.clean();
        assert!(rb.is_empty());
        assert_eq!(rb.write.load(Ordering::Relaxed), 0);
        assert_eq!(rb.read.load(Ordering::Relaxed), 0);
        assert_eq!(rb.free_len(), 3);
    }

    #[test]
    fn split_halves_share_the_queue() {
        let mut rb: RingBuffer<u8, U4> = RingBuffer::new();
        let (mut p, mut c) = rb.split();
        p.try_push(7).unwrap();
        p.try_push(8).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.try_pop(), Some(7));
        p.try_push(9).unwrap();
        p.try_push(10).unwrap();
        assert!(p.is_full());
        assert_eq!(p.try_push(11), Err(11));
        assert_eq!(c.try_pop(), Some(8));
        assert_eq!(c.try_pop(), Some(9));
        assert_eq!(c.try_pop(), Some(10));
        assert!(c.is_empty());
    }

    #[test]
    fn buffered_values_are_dropped_with_the_buffer() {
        use std::rc::Rc;

        let marker = Rc::new(());
        {
            let mut rb: RingBuffer<Rc<()>, U4> = RingBuffer::new();
            rb.try_push(marker.clone()).unwrap();
            rb.try_push(marker.clone()).unwrap();
            assert_eq!(Rc::strong_count(&marker), 3);
        }
        assert_eq!(Rc::strong_count(&marker), 1);
    }
}
