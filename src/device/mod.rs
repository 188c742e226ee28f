use crate::status::Status;

pub mod serial;
// basic data structures
pub mod base;

/// Register-level access to one UART, implemented per board.
///
/// Clocking and baud generation are set up before a driver is attached;
/// the driver only needs the status flags and the data register.
pub trait SerialHardware {
    // read the status register
    fn status(&self) -> Status;
    // clear the given status flags, leaving the others set
    fn clear_status(&self, flags: Status);

    // read the received byte
    fn read_data(&self) -> u8;
    // load a byte into the transmit register
    fn write_data(&self, byte: u8);

    // raise the transmit-ready condition so the interrupt fires and starts
    // draining the transmit buffer; called from mainline code
    fn request_transmit(&self);
}

impl<H: SerialHardware + ?Sized> SerialHardware for &H {
    fn status(&self) -> Status {
        (**self).status()
    }

    fn clear_status(&self, flags: Status) {
        (**self).clear_status(flags)
    }

    fn read_data(&self) -> u8 {
        (**self).read_data()
    }

    fn write_data(&self, byte: u8) {
        (**self).write_data(byte)
    }

    fn request_transmit(&self) {
        (**self).request_transmit()
    }
}
