use crate::config::DispatchPolicy;
use crate::device::base::Slots;
use crate::device::serial::rx::RxFill;
use crate::device::serial::tx::TxDrain;
use crate::device::SerialHardware;
use crate::status::Status;
use core::sync::atomic::{AtomicU8, Ordering};
use log::trace;

/// Interrupt entry point of one UART.
///
/// Owns the interrupt-side halves of both paths. `on_interrupt` must be
/// called once per UART interrupt, and never re-entered.
pub struct InterruptDispatcher<'a, N: Slots<u8>, H: SerialHardware> {
    tx: TxDrain<'a, N>,
    rx: RxFill<'a, N>,
    hw: &'a H,
    policy: &'a AtomicU8,
}

impl<'a, N: Slots<u8>, H: SerialHardware> InterruptDispatcher<'a, N, H> {
    pub(crate) fn new(tx: TxDrain<'a, N>, rx: RxFill<'a, N>, hw: &'a H, policy: &'a AtomicU8) -> Self {
        InterruptDispatcher { tx, rx, hw, policy }
    }

    pub fn policy(&self) -> DispatchPolicy {
        DispatchPolicy::from_bits(self.policy.load(Ordering::Relaxed))
    }

    /// Services the pending UART event(s) and returns the flags handled.
    ///
    /// Each handled flag is cleared after its branch has run, exactly once.
    pub fn on_interrupt(&mut self) -> Status {
        let status = self.hw.status();
        trace!("uart irq: {:?}", status);

        let mut handled = Status::zero();
        match self.policy() {
            DispatchPolicy::Exclusive => {
                // one event per interrupt: anything but transmit-ready is
                // taken to be a received byte
                if status.get_tx_ready() {
                    self.transmit_ready();
                    handled.set_tx_ready(true);
                } else {
                    self.byte_received();
                    handled.set_rx_ready(true);
                }
            }
            DispatchPolicy::Independent => {
                // receive first, the data register is overwritten by the
                // next incoming byte
                if status.get_rx_ready() {
                    self.byte_received();
                    handled.set_rx_ready(true);
                }
                if status.get_tx_ready() {
                    self.transmit_ready();
                    handled.set_tx_ready(true);
                }
            }
        }
        handled
    }

    fn transmit_ready(&mut self) {
        self.tx.on_transmit_ready(self.hw);
        self.hw.clear_status(Status::TX_READY);
    }

    fn byte_received(&mut self) {
        let byte = self.hw.read_data();
        self.rx.on_byte_received(byte);
        self.hw.clear_status(Status::RX_READY);
    }
}
