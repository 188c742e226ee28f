//! Standard traits for the application side of a channel.
//!
//! `embedded_hal` serial traits report a full transmit buffer or an empty
//! receive buffer as `WouldBlock`, so `nb::block!` turns them into busy-wait
//! loops. Those loops only make progress while the UART interrupt runs.

use crate::device::base::Slots;
use crate::device::serial::SerialPort;
use crate::device::SerialHardware;
use core::convert::Infallible;
use core::fmt;
use embedded_hal::blocking;
use embedded_hal::serial;

impl<'a, N: Slots<u8>, H: SerialHardware> serial::Read<u8> for SerialPort<'a, N, H> {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.dequeue().ok_or(nb::Error::WouldBlock)
    }
}

impl<'a, N: Slots<u8>, H: SerialHardware> serial::Write<u8> for SerialPort<'a, N, H> {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        self.enqueue(word).map_err(|_| nb::Error::WouldBlock)
    }

    // done once the interrupt has found the buffer empty
    fn flush(&mut self) -> nb::Result<(), Infallible> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl<'a, N: Slots<u8>, H: SerialHardware> blocking::serial::write::Default<u8>
    for SerialPort<'a, N, H>
{
}

impl<'a, N: Slots<u8>, H: SerialHardware> fmt::Write for SerialPort<'a, N, H> {
    /// Queues the whole string; fails if any byte did not fit.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.enqueue_string(s.as_bytes()) == 0 {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}
