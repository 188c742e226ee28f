use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum SerialError {
    // the rejected byte is handed back to the caller
    #[error("transmit buffer full, byte {0:#04x} rejected")]
    BufferFull(u8),
    #[error("driver already split into port and dispatcher")]
    AlreadySplit,
    #[error("interrupt binding already holds a dispatcher")]
    AlreadyBound,
}

/// Baud-rate generator settings that the clock cannot produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("baud rate must be non-zero")]
    ZeroBaud,
    #[error("timer divisor {divisor} outside 1..=255")]
    DivisorOutOfRange { divisor: u32 },
}
