use core::fmt::{self, Debug, Formatter};
use core::ops::BitOr;
use paste::paste;

/// UART status flags, laid out like an 8051 `SCON` register.
///
/// Bit 0 is the receive flag (RI), bit 1 the transmit flag (TI). Other bits
/// are carried through untouched.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub struct Status(u8);

macro_rules! flag {
    ($flag: expr, $name: ident) => {
        paste! {
            pub fn [<set_ $name>](&mut self, f: bool) -> &mut Self {
                if f {
                    self.0 |= 1 << $flag;
                } else {
                    self.0 &= !(1 << $flag);
                }
                self
            }
            pub const fn [<get_ $name>](&self) -> bool {
                self.0 & (1 << $flag) != 0
            }
        }
    };
}

impl Status {
    pub const RX_READY: Status = Status(1 << 0);
    pub const TX_READY: Status = Status(1 << 1);

    pub const fn zero() -> Self {
        Status(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Status(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 & (Self::RX_READY.0 | Self::TX_READY.0) == 0
    }

    pub const fn contains(&self, other: Status) -> bool {
        self.0 & other.0 == other.0
    }

    // a byte has been received and waits in the data register
    flag!(0, rx_ready);
    // the transmit register can take the next byte
    flag!(1, tx_ready);
}

impl BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        Status(self.0 | rhs.0)
    }
}

impl Debug for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Status")
            .field("rx_ready", &self.get_rx_ready())
            .field("tx_ready", &self.get_tx_ready())
            .finish()
    }
}
