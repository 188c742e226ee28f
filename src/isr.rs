//! Glue between a `'static` dispatcher and the interrupt vector.

use crate::error::SerialError;
use core::cell::RefCell;
use critical_section::Mutex;
use log::info;

/// Slot an interrupt handler reaches its dispatcher through.
///
/// Mainline code installs the dispatcher once after splitting a `'static`
/// `Uart`; the handler generated by `uart_interrupt!` runs it.
pub struct IsrBinding<D> {
    slot: Mutex<RefCell<Option<D>>>,
}

impl<D> IsrBinding<D> {
    pub const fn new() -> Self {
        IsrBinding {
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    pub fn install(&self, dispatcher: D) -> Result<(), SerialError> {
        critical_section::with(|cs| {
            let mut slot = self.slot.borrow_ref_mut(cs);
            if slot.is_some() {
                return Err(SerialError::AlreadyBound);
            }
            *slot = Some(dispatcher);
            info!("uart interrupt bound");
            Ok(())
        })
    }

    /// Runs `f` on the bound dispatcher. `None` when nothing is installed.
    pub fn run<R>(&self, f: impl FnOnce(&mut D) -> R) -> Option<R> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).as_mut().map(f))
    }

    pub fn take(&self) -> Option<D> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).take())
    }

    pub fn is_bound(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref(cs).is_some())
    }
}

/// Defines the C-ABI interrupt handler `$name` that dispatches through the
/// `IsrBinding` `$binding`.
#[macro_export]
macro_rules! uart_interrupt {
    ($name: ident, $binding: expr) => {
        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "C" fn $name() {
            let _ = $binding.run(|d| d.on_interrupt());
        }
    };
}
