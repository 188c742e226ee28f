//! Static configuration of a serial channel.
//!
//! Buffer sizes are type-level (`typenum`) so they are fixed at build time.
//! Baud-rate generation belongs to the board setup; `BaudConfig` only checks
//! that a requested rate is reachable from the system clock.

use crate::error::ConfigError;

/// Slot count used when a `Uart` is declared without one: 32 slots, 31 usable.
pub type DefaultSlots = typenum::U32;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SerialBaudRate {
    B9600 = 9600,
    B19200 = 19200,
    B57600 = 57600,
    B115200 = 115200,
}

impl SerialBaudRate {
    pub const fn bps(self) -> u32 {
        self as u32
    }
}

/// Line framing. Fixed at 8 data bits, 1 stop bit, no parity.
pub struct Frame;

impl Frame {
    pub const DATA_BITS: u8 = 8;
    pub const STOP_BITS: u8 = 1;
    pub const PARITY: bool = false;
}

/// Baud generator derived from the system clock with a 16x oversampling timer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BaudConfig {
    pub sysclk: u32,
    pub baud: u32,
}

impl BaudConfig {
    pub const fn new(sysclk: u32, rate: SerialBaudRate) -> Self {
        BaudConfig {
            sysclk,
            baud: rate.bps(),
        }
    }

    /// Timer reload divisor `sysclk / (baud * 16)`.
    ///
    /// The timer is 8 bits wide, so divisors outside `1..=255` cannot be
    /// produced. Evaluate it in a `const` to turn a bad setting into a build
    /// failure.
    pub const fn timer_divisor(&self) -> Result<u8, ConfigError> {
        if self.baud == 0 {
            return Err(ConfigError::ZeroBaud);
        }
        let divisor = self.sysclk as u64 / (self.baud as u64 * 16);
        if divisor == 0 || divisor > 255 {
            Err(ConfigError::DivisorOutOfRange {
                divisor: divisor as u32,
            })
        } else {
            Ok(divisor as u8)
        }
    }

    /// Rate the line actually runs at once the divisor is rounded down.
    pub const fn actual_baud(&self) -> Result<u32, ConfigError> {
        match self.timer_divisor() {
            Ok(div) => Ok(self.sysclk / (div as u32 * 16)),
            Err(e) => Err(e),
        }
    }
}

/// How the interrupt dispatcher reads the status flags.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum DispatchPolicy {
    /// Transmit-ready is checked first; otherwise the event is taken to be a
    /// received byte. One flag is serviced per interrupt.
    Exclusive = 0,
    /// Both flags are checked and serviced in the same interrupt.
    Independent = 1,
}

impl DispatchPolicy {
    pub(crate) const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => DispatchPolicy::Exclusive,
            _ => DispatchPolicy::Independent,
        }
    }
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        DispatchPolicy::Independent
    }
}

/// Runtime settings applied through `Uart::control`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SerialConfig {
    Dispatch(DispatchPolicy),
    ResetOverflowCount,
}
