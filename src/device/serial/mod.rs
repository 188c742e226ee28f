pub mod irq;
pub mod rx;
pub mod tx;

use crate::config::{DefaultSlots, DispatchPolicy, SerialConfig};
use crate::device::base::Slots;
use crate::device::SerialHardware;
use crate::error::SerialError;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use log::info;

pub use irq::InterruptDispatcher;
pub use rx::{ReceivePath, RxFill, RxQueue};
pub use tx::{TransmitPath, TxDrain, TxQueue};

/// State of one UART channel: both buffers, the transmit flag and the
/// dispatch settings.
///
/// A `Uart` is split once into the application's `SerialPort` and the
/// interrupt's `InterruptDispatcher`. Several `Uart`s can coexist, one per
/// channel.
pub struct Uart<N: Slots<u8> = DefaultSlots> {
    tx: TransmitPath<N>,
    rx: ReceivePath<N>,
    policy: AtomicU8,
    split: AtomicBool,
}

impl<N: Slots<u8>> Uart<N> {
    pub fn new() -> Self {
        Self::with_policy(DispatchPolicy::default())
    }

    pub fn with_policy(policy: DispatchPolicy) -> Self {
        Uart {
            tx: TransmitPath::new(),
            rx: ReceivePath::new(),
            policy: AtomicU8::new(policy as u8),
            split: AtomicBool::new(false),
        }
    }

    pub fn control(&self, cfg: SerialConfig) {
        match cfg {
            SerialConfig::Dispatch(policy) => self.policy.store(policy as u8, Ordering::Relaxed),
            SerialConfig::ResetOverflowCount => self.rx.reset_overflow_count(),
        }
    }

    pub fn policy(&self) -> DispatchPolicy {
        DispatchPolicy::from_bits(self.policy.load(Ordering::Relaxed))
    }

    pub fn is_tx_active(&self) -> bool {
        self.tx.is_active()
    }

    pub fn overflow_count(&self) -> usize {
        self.rx.overflow_count()
    }

    /// Hands out the application port and the interrupt dispatcher, both
    /// driving `hw`. Succeeds once; later calls return `AlreadySplit`.
    pub fn split<'a, H: SerialHardware>(
        &'a self,
        hw: &'a H,
    ) -> Result<(SerialPort<'a, N, H>, InterruptDispatcher<'a, N, H>), SerialError> {
        if self.split.swap(true, Ordering::AcqRel) {
            return Err(SerialError::AlreadySplit);
        }
        // the flag above guarantees this is the only producer/consumer pair
        let (tx_queue, tx_drain) = unsafe { self.tx.split_unchecked() };
        let (rx_fill, rx_queue) = unsafe { self.rx.split_unchecked() };
        info!(
            "uart split: {} byte tx / {} byte rx buffers, {:?} dispatch",
            self.tx.capacity(),
            self.rx.capacity(),
            self.policy()
        );
        Ok((
            SerialPort {
                tx: tx_queue,
                rx: rx_queue,
                hw,
            },
            InterruptDispatcher::new(tx_drain, rx_fill, hw, &self.policy),
        ))
    }

    /// Returns the channel to its power-on state: empty buffers, transmitter
    /// idle, overflow count cleared, ready to be split again.
    pub fn reset(&mut self) {
        self.tx.reset();
        self.rx.reset();
        *self.split.get_mut() = false;
    }
}

impl<N: Slots<u8>> Default for Uart<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Application side of a UART channel. Nothing here blocks.
pub struct SerialPort<'a, N: Slots<u8>, H: SerialHardware> {
    tx: TxQueue<'a, N>,
    rx: RxQueue<'a, N>,
    hw: &'a H,
}

impl<'a, N: Slots<u8>, H: SerialHardware> SerialPort<'a, N, H> {
    /// Queues one byte for transmission. A full buffer returns
    /// `BufferFull` with the byte; retrying or dropping it is up to the caller.
    pub fn enqueue(&mut self, byte: u8) -> Result<(), SerialError> {
        self.tx.enqueue(self.hw, byte)
    }

    /// Queues every byte of `bytes`, skipping the ones that do not fit.
    /// Returns how many were rejected.
    pub fn enqueue_string(&mut self, bytes: &[u8]) -> usize {
        bytes
            .iter()
            .filter(|&&b| self.enqueue(b).is_err())
            .count()
    }

    pub fn dequeue(&mut self) -> Option<u8> {
        self.rx.dequeue()
    }

    /// True once the interrupt has drained the transmit buffer and gone idle.
    pub fn is_idle(&self) -> bool {
        !self.tx.is_active()
    }

    pub fn pending_tx(&self) -> usize {
        self.tx.pending()
    }

    pub fn free_tx(&self) -> usize {
        self.tx.free_len()
    }

    pub fn available(&self) -> usize {
        self.rx.available()
    }

    /// Received bytes dropped because the receive buffer was full.
    pub fn overflow_count(&self) -> usize {
        self.rx.overflow_count()
    }
}
