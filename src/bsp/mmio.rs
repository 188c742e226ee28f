use crate::device::SerialHardware;
use crate::status::Status;
use vcell::VolatileCell;

/// Memory-mapped SCON/SBUF register pair of an 8051-style UART.
///
/// SCON holds the status flags (`Status` layout), SBUF the data register.
#[repr(C)]
pub struct Scon {
    scon: VolatileCell<u8>,
    sbuf: VolatileCell<u8>,
}

// registers are only reached through volatile accesses; read-modify-write
// from mainline code runs inside a critical section
unsafe impl Sync for Scon {}

impl Scon {
    /// A register pair in ordinary memory, for targets that mirror the
    /// peripheral in RAM and for host tests.
    pub const fn new() -> Self {
        Scon {
            scon: VolatileCell::new(0),
            sbuf: VolatileCell::new(0),
        }
    }

    /// # Safety
    ///
    /// `addr` must be the address of a SCON/SBUF pair that stays mapped for
    /// the rest of the program.
    pub unsafe fn from_addr(addr: usize) -> &'static Scon {
        &*(addr as *const Scon)
    }

    /// Sets flags the way the peripheral does when an event completes.
    pub fn raise(&self, flags: Status) {
        critical_section::with(|_| self.scon.set(self.scon.get() | flags.bits()));
    }

    pub fn scon(&self) -> u8 {
        self.scon.get()
    }

    pub fn sbuf(&self) -> u8 {
        self.sbuf.get()
    }
}

impl Default for Scon {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialHardware for Scon {
    fn status(&self) -> Status {
        Status::from_bits(self.scon.get())
    }

    fn clear_status(&self, flags: Status) {
        critical_section::with(|_| self.scon.set(self.scon.get() & !flags.bits()));
    }

    fn read_data(&self) -> u8 {
        self.sbuf.get()
    }

    fn write_data(&self, byte: u8) {
        self.sbuf.set(byte);
    }

    fn request_transmit(&self) {
        self.raise(Status::TX_READY);
    }
}
