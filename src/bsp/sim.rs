//! Host-side stand-in for a UART peripheral.
//!
//! `SimUart` behaves like the real register pair closely enough to drive the
//! dispatcher from tests: a written byte sits in the shift register until the
//! next time the peripheral is looked at, then lands on the simulated line
//! and raises transmit-ready.

use crate::device::base::{RingBuffer, Slots};
use crate::device::SerialHardware;
use crate::status::Status;
use core::cell::{Cell, RefCell};
use typenum::U256;

pub struct SimUart<L: Slots<u8> = U256> {
    status: Cell<u8>,
    rx_data: Cell<u8>,
    shifting: Cell<Option<u8>>,
    line: RefCell<RingBuffer<u8, L>>,
    tx_requests: Cell<usize>,
    overruns: Cell<usize>,
}

impl SimUart {
    pub fn new() -> Self {
        Self::with_line()
    }
}

impl<L: Slots<u8>> SimUart<L> {
    /// Simulated UART whose line keeps up to `L - 1` sent bytes.
    pub fn with_line() -> Self {
        SimUart {
            status: Cell::new(0),
            rx_data: Cell::new(0),
            shifting: Cell::new(None),
            line: RefCell::new(RingBuffer::new()),
            tx_requests: Cell::new(0),
            overruns: Cell::new(0),
        }
    }

    /// A byte arrives on the wire: latch it and raise receive-ready.
    /// Latching over an unread byte counts as a hardware overrun.
    pub fn inject(&self, byte: u8) {
        if Status::from_bits(self.status.get()).get_rx_ready() {
            self.overruns.set(self.overruns.get() + 1);
        }
        self.rx_data.set(byte);
        self.raise(Status::RX_READY);
    }

    /// Finishes shifting out the byte in the transmit register, if any.
    pub fn settle(&self) {
        if let Some(byte) = self.shifting.take() {
            // bytes beyond the line capacity are lost, tests read them back
            // long before that
            let _ = self.line.borrow_mut().try_push(byte);
            self.raise(Status::TX_READY);
        }
    }

    /// Next byte that went out on the wire.
    pub fn take_sent(&self) -> Option<u8> {
        self.settle();
        self.line.borrow_mut().try_pop()
    }

    /// True while the peripheral would hold its interrupt line asserted.
    pub fn interrupt_pending(&self) -> bool {
        self.settle();
        !Status::from_bits(self.status.get()).is_empty()
    }

    /// How many times mainline code asked for a transmission to start.
    pub fn tx_requests(&self) -> usize {
        self.tx_requests.get()
    }

    pub fn overruns(&self) -> usize {
        self.overruns.get()
    }

    fn raise(&self, flags: Status) {
        self.status.set(self.status.get() | flags.bits());
    }
}

impl<L: Slots<u8>> Default for SimUart<L> {
    fn default() -> Self {
        Self::with_line()
    }
}

impl<L: Slots<u8>> SerialHardware for SimUart<L> {
    fn status(&self) -> Status {
        self.settle();
        Status::from_bits(self.status.get())
    }

    fn clear_status(&self, flags: Status) {
        self.status.set(self.status.get() & !flags.bits());
    }

    fn read_data(&self) -> u8 {
        self.rx_data.get()
    }

    fn write_data(&self, byte: u8) {
        self.settle();
        self.shifting.set(Some(byte));
    }

    fn request_transmit(&self) {
        self.tx_requests.set(self.tx_requests.get() + 1);
        self.raise(Status::TX_READY);
    }
}
