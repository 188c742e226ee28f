//! Hardware back ends for `SerialHardware`.

pub mod mmio;
pub mod sim;

pub use mmio::Scon;
pub use sim::SimUart;
