//! Interrupt-driven UART transport over fixed-size ring buffers.
//!
//! A `Uart` owns a transmit and a receive ring. Splitting it yields the
//! application's `SerialPort` (enqueue/dequeue, never blocking) and the
//! `InterruptDispatcher`, which the UART interrupt calls on every event. The
//! interrupt is the only producer of received bytes and the only consumer of
//! bytes to send.
#![cfg_attr(not(test), no_std)]

pub mod api;
pub mod bsp;
pub mod config;
pub mod device;
pub mod error;
pub mod isr;
pub mod status;

// links the single-core critical-section implementation
#[cfg(feature = "cortex-m")]
use cortex_m as _;

pub use config::{BaudConfig, DefaultSlots, DispatchPolicy, Frame, SerialBaudRate, SerialConfig};
pub use device::base::{Consumer, Producer, RingBuffer, Slots};
pub use device::serial::{InterruptDispatcher, ReceivePath, SerialPort, TransmitPath, Uart};
pub use device::SerialHardware;
pub use error::*;
pub use isr::IsrBinding;
pub use status::Status;

pub use generic_array;
pub use typenum;
